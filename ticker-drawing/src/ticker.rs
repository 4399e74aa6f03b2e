//! Ticker composition and the scroll viewport.
//!
//! The composed ticker is one wide bitmap; the viewport is a panel-sized
//! window into it that wraps around the right edge, so the two crops placed
//! side by side reproduce exactly what a circular buffer read would yield.

use crate::{
    bitmap::Bitmap,
    items::{ItemStyle, text_height, text_width},
};
use embedded_graphics::{
    mono_font::MonoTextStyle,
    prelude::*,
    text::{Alignment, Baseline, LineHeight, Text, TextStyle, TextStyleBuilder},
};
use log::*;
use more_asserts::*;

const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .line_height(LineHeight::Percent(100))
    .build();

/// Concatenates the rendered items into one wide ticker bitmap.
///
/// `item_spacing` separates consecutive items (never trails the last one);
/// a loop gap of one panel width follows the final item so the loop point
/// shows blank panel instead of an abrupt jump. The result is floored at
/// the panel width and is `None` only for an empty item sequence, which is
/// the "no games" signal.
pub fn compose(
    items: &[Bitmap],
    item_spacing: u32,
    panel_width: u32,
    panel_height: u32,
) -> Option<Bitmap> {
    if items.is_empty() {
        return None;
    }

    let content_width: u32 = items.iter().map(Bitmap::width).sum::<u32>()
        + item_spacing * (items.len() as u32 - 1);
    let total_width = content_width + panel_width;

    let mut ticker = Bitmap::new(total_width.max(panel_width), panel_height);
    let mut x = 0i32;
    for (i, item) in items.iter().enumerate() {
        ticker.paste(item, x, 0);
        x += item.width() as i32;
        if i < items.len() - 1 {
            x += item_spacing as i32;
        }
    }
    debug!(
        "Composed ticker: {} items, {}x{} px",
        items.len(),
        ticker.width(),
        ticker.height()
    );
    Some(ticker)
}

/// A panel-sized crop of the ticker starting at `offset`, wrapping around
/// the right edge when the window crosses it.
pub fn viewport(ticker: &Bitmap, offset: u32, panel_width: u32) -> Bitmap {
    let mut frame = Bitmap::new(panel_width, ticker.height());

    if ticker.width() <= panel_width {
        frame.paste(ticker, 0, 0);
        return frame;
    }

    let left = offset % ticker.width();
    let right = left + panel_width;
    if right <= ticker.width() {
        frame.paste(&ticker.crop_columns(left, panel_width), 0, 0);
    } else {
        let first = ticker.crop_columns(left, ticker.width() - left);
        let remainder = right - ticker.width();
        frame.paste(&first, 0, 0);
        frame.paste(&ticker.crop_columns(0, remainder), first.width() as i32, 0);
    }
    frame
}

/// Advances the scroll cursor, wrapping at the ticker width.
pub fn advance(offset: u32, step: u32, width: u32) -> u32 {
    assert_gt!(width, 0);
    (offset + step.max(1)) % width
}

/// Remaps a cursor onto a new ticker width, preserving the relative scroll
/// position across a content refresh.
pub fn remap_offset(old_offset: u32, old_width: u32, new_width: u32) -> u32 {
    if old_width == 0 || new_width == 0 {
        return 0;
    }
    let ratio = (old_offset % old_width) as f64 / old_width as f64;
    let mapped = (ratio * new_width as f64) as u32;
    mapped.min(new_width - 1)
}

/// The fixed frame shown when no ticker exists.
pub fn no_games_frame(style: &ItemStyle, panel_width: u32) -> Bitmap {
    const MESSAGE: &str = "NO GAMES TODAY";

    let mut frame = Bitmap::new(panel_width, style.panel_height);
    let y = style
        .panel_height
        .saturating_sub(text_height(style.header_font))
        / 2;
    let font = if text_width(style.header_font, MESSAGE) <= panel_width {
        style.header_font
    } else {
        style.body_font
    };
    Text::with_text_style(
        MESSAGE,
        Point::new(panel_width as i32 / 2, y as i32),
        MonoTextStyle::new(font, style.text_color),
        CENTERED,
    )
    .draw(&mut frame)
    .unwrap();
    frame
}
