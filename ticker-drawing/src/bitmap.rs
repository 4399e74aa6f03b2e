//! An owned RGB framebuffer that the composition pipeline draws into.
//!
//! All drawing goes through the `embedded-graphics` `DrawTarget` impl;
//! `paste`/`crop_columns` exist for ticker composition, which moves whole
//! item bitmaps around instead of redrawing them.

use embedded_graphics::{Pixel, pixelcolor::Rgb888, prelude::*};
use more_asserts::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 3) as usize
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.data[i] = color.r();
            self.data[i + 1] = color.g();
            self.data[i + 2] = color.b();
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb888 {
        let i = self.index(x, y);
        Rgb888::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Copies `src` onto `self` with its top-left corner at (`x`, `y`),
    /// clipping anything that falls outside.
    pub fn paste(&mut self, src: &Bitmap, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let si = src.index(sx, sy);
                let di = self.index(dx as u32, dy as u32);
                self.data[di..di + 3].copy_from_slice(&src.data[si..si + 3]);
            }
        }
    }

    /// Alpha-blends an RGBA pixel block onto `self`, clipping at the edges.
    pub fn blit_rgba(&mut self, pixels: &[u8], width: u32, height: u32, x: i32, y: i32) {
        assert_ge!(pixels.len(), (width * height * 4) as usize);
        for sy in 0..height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let si = ((sy * width + sx) * 4) as usize;
                let alpha = pixels[si + 3] as u32;
                if alpha == 0 {
                    continue;
                }
                let di = self.index(dx as u32, dy as u32);
                for channel in 0..3 {
                    let src = pixels[si + channel] as u32;
                    let dst = self.data[di + channel] as u32;
                    self.data[di + channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
                }
            }
        }
    }

    /// A full-height copy of the column range `[x, x + width)`.
    pub fn crop_columns(&self, x: u32, width: u32) -> Bitmap {
        assert_le!(x + width, self.width);
        let mut out = Bitmap::new(width, self.height);
        for y in 0..self.height {
            let src_start = self.index(x, y);
            let dst_start = out.index(0, y);
            out.data[dst_start..dst_start + (width * 3) as usize]
                .copy_from_slice(&self.data[src_start..src_start + (width * 3) as usize]);
        }
        out
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paste_clips() {
        let mut dst = Bitmap::new(4, 4);
        let mut src = Bitmap::new(2, 2);
        src.set_pixel(0, 0, Rgb888::RED);
        src.set_pixel(1, 1, Rgb888::GREEN);

        dst.paste(&src, 3, 3);
        assert_eq!(dst.pixel(3, 3), Rgb888::RED);

        dst.paste(&src, -1, -1);
        assert_eq!(dst.pixel(0, 0), Rgb888::GREEN);
    }

    #[test]
    fn test_crop_columns() {
        let mut bmp = Bitmap::new(6, 2);
        for x in 0..6 {
            bmp.set_pixel(x, 0, Rgb888::new(x as u8, 0, 0));
        }
        let crop = bmp.crop_columns(2, 3);
        assert_eq!(crop.width(), 3);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.pixel(0, 0), Rgb888::new(2, 0, 0));
        assert_eq!(crop.pixel(2, 0), Rgb888::new(4, 0, 0));
    }

    #[test]
    fn test_blit_rgba_blends() {
        let mut dst = Bitmap::new(2, 1);
        dst.set_pixel(0, 0, Rgb888::new(100, 100, 100));
        dst.set_pixel(1, 0, Rgb888::new(100, 100, 100));

        // One opaque white pixel, one fully transparent.
        let pixels = [255, 255, 255, 255, 0, 0, 0, 0];
        dst.blit_rgba(&pixels, 2, 1, 0, 0);
        assert_eq!(dst.pixel(0, 0), Rgb888::new(255, 255, 255));
        assert_eq!(dst.pixel(1, 0), Rgb888::new(100, 100, 100));
    }

    #[test]
    fn test_draw_target_bounds() {
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let mut bmp = Bitmap::new(4, 4);
        Rectangle::new(Point::new(2, 2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::BLUE))
            .draw(&mut bmp)
            .unwrap();
        assert_eq!(bmp.pixel(3, 3), Rgb888::BLUE);
        assert_eq!(bmp.pixel(1, 1), Rgb888::BLACK);
    }
}
