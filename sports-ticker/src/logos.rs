//! Team and league logo loading.
//!
//! Downloaded images are kept on disk keyed by URL hash so restarts don't
//! re-fetch them. Prepared logos (trimmed, resized, centered on a square
//! transparent canvas) are memoized per size in memory. Every failure path
//! degrades to `None`; the renderer draws an outlined-abbreviation fallback
//! in that case, so logos never block a cycle.

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use log::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use ticker_drawing::items::Logo;

pub struct LogoCache {
    dir: PathBuf,
    client: reqwest::blocking::Client,
    prepared: HashMap<(String, u32), Option<Logo>>,
}

impl LogoCache {
    pub fn new(dir: PathBuf, timeout: Duration) -> Option<Self> {
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Failed to create logo dir {}: {e}", dir.display());
            return None;
        }
        let client = match reqwest::blocking::Client::builder()
            .user_agent(concat!("sports-ticker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build logo client: {e}");
                return None;
            }
        };
        Some(Self {
            dir,
            client,
            prepared: HashMap::new(),
        })
    }

    /// Returns the prepared logo for `url` at `size`, fetching and caching
    /// as needed.
    pub fn load(&mut self, url: Option<&str>, size: u32) -> Option<Logo> {
        let url = url?;
        if size == 0 {
            return None;
        }
        let key = (url.to_string(), size);
        if let Some(cached) = self.prepared.get(&key) {
            return cached.clone();
        }
        let logo = self
            .raw_bytes(url)
            .and_then(|bytes| prepare_logo(&bytes, size));
        self.prepared.insert(key, logo.clone());
        logo
    }

    fn disk_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.png", &hex::encode(digest)[..16]))
    }

    fn raw_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.disk_path(url);
        if let Ok(bytes) = fs::read(&path) {
            return Some(bytes);
        }

        let response = match self.client.get(url).send().and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(e) => {
                debug!("Logo fetch failed for {url}: {e}");
                return None;
            }
        };
        let bytes = match response.bytes() {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                debug!("Logo read failed for {url}: {e}");
                return None;
            }
        };
        if let Err(e) = fs::write(&path, &bytes) {
            debug!("Failed to save logo {}: {e}", path.display());
        }
        Some(bytes)
    }
}

/// Decodes, trims transparent margins, resizes to fit, and centers the image
/// on a transparent `size`-square canvas.
fn prepare_logo(bytes: &[u8], size: u32) -> Option<Logo> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            debug!("Logo decode failed: {e}");
            return None;
        }
    };

    let trimmed = trim_transparent(&image)?;
    let fitted = DynamicImage::ImageRgba8(trimmed).resize(size, size, FilterType::Lanczos3);
    let fitted = fitted.to_rgba8();

    let mut canvas = RgbaImage::new(size, size);
    let dx = (size - fitted.width().min(size)) / 2;
    let dy = (size - fitted.height().min(size)) / 2;
    image::imageops::overlay(&mut canvas, &fitted, dx as i64, dy as i64);

    Some(Logo {
        size,
        pixels: canvas.into_raw(),
    })
}

/// Crops the image to the bounding box of its non-transparent pixels.
/// Returns `None` for a fully transparent image.
fn trim_transparent(image: &RgbaImage) -> Option<RgbaImage> {
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x {
        return None;
    }
    Some(
        image::imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
            .to_image(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgba;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image.clone())
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_prepare_trims_and_centers() {
        // A 64x64 image with a lone opaque 16x16 block off in one corner.
        let mut image = RgbaImage::new(64, 64);
        for x in 4..20 {
            for y in 4..20 {
                image.put_pixel(x, y, Rgba([200, 0, 0, 255]));
            }
        }
        let logo = prepare_logo(&encode_png(&image), 24).unwrap();
        assert_eq!(logo.size, 24);
        assert_eq!(logo.pixels.len(), 24 * 24 * 4);

        // The square content fills the whole canvas after the trim.
        let center = (12 * 24 + 12) * 4;
        assert_eq!(logo.pixels[center + 3], 255);
        assert_eq!(logo.pixels[center], 200);
    }

    #[test]
    fn test_prepare_centers_wide_content() {
        // Opaque 40x10 stripe; the fit keeps the aspect ratio, so the
        // vertical margins stay transparent.
        let mut image = RgbaImage::new(40, 10);
        for (_, _, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([0, 120, 0, 255]);
        }
        let logo = prepare_logo(&encode_png(&image), 20).unwrap();
        let top_edge = 10 * 4;
        assert_eq!(logo.pixels[top_edge + 3], 0);
        let middle = (10 * 20 + 10) * 4;
        assert_eq!(logo.pixels[middle + 3], 255);
    }

    #[test]
    fn test_fully_transparent_is_none() {
        let image = RgbaImage::new(8, 8);
        assert_eq!(prepare_logo(&encode_png(&image), 16), None);
    }

    #[test]
    fn test_garbage_bytes_are_none() {
        assert_eq!(prepare_logo(b"not an image", 16), None);
    }
}
