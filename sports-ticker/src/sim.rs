//! Terminal panel simulator.
//!
//! Renders frames as ANSI truecolor half-blocks (each character cell covers
//! two vertical pixels) so the ticker can be developed without hardware.

use crate::plugin::DisplayDriver;
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use std::io::{Write, stdout};
use ticker_drawing::bitmap::Bitmap;

pub struct TerminalPanel {
    _private: (),
}

impl TerminalPanel {
    pub fn new() -> Self {
        print!("\x1b[2J\x1b[?25l");
        Self { _private: () }
    }
}

impl Default for TerminalPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDriver for TerminalPanel {
    fn show(&mut self, frame: &Bitmap) {
        let mut out = String::with_capacity((frame.width() * frame.height() * 20) as usize);
        out.push_str("\x1b[H");
        for row in (0..frame.height()).step_by(2) {
            for x in 0..frame.width() {
                let top = frame.pixel(x, row);
                let bottom = if row + 1 < frame.height() {
                    frame.pixel(x, row + 1)
                } else {
                    Rgb888::new(0, 0, 0)
                };
                out.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r(),
                    top.g(),
                    top.b(),
                    bottom.r(),
                    bottom.g(),
                    bottom.b(),
                ));
            }
            out.push_str("\x1b[0m\n");
        }
        print!("{out}");
        let _ = stdout().flush();
    }

    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = stdout().flush();
    }
}

impl Drop for TerminalPanel {
    fn drop(&mut self) {
        print!("\x1b[0m\x1b[?25h");
        let _ = stdout().flush();
    }
}
