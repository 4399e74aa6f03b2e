//! Renders the three ticker item kinds: league header, section label, and
//! game card. Every item is sized from measured text and logo dimensions,
//! never from fixed constants.

use crate::bitmap::Bitmap;
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::*},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, LineHeight, Text, TextStyle, TextStyleBuilder},
};
use ticker_common::{
    config::{Rgb, TickerConfig},
    game::{GameEntry, GameState},
};

const LEFT_ALGN: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .line_height(LineHeight::Percent(100))
    .build();

/// A prepared team or league logo: a square RGBA pixel block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub size: u32,
    pub pixels: Vec<u8>,
}

/// Nearest built-in mono face for a configured pixel size.
pub fn font_for_size(size: u32) -> &'static MonoFont<'static> {
    match size {
        0..=6 => &FONT_4X6,
        7..=8 => &FONT_5X8,
        9..=10 => &FONT_6X10,
        11..=13 => &FONT_7X13,
        14..=15 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

pub fn text_width(font: &MonoFont, text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        0
    } else {
        chars * (font.character_size.width + font.character_spacing) - font.character_spacing
    }
}

pub fn text_height(font: &MonoFont) -> u32 {
    font.character_size.height
}

/// Longest prefix of `text` (with a `...` suffix when truncated) that fits
/// in `max_width`.
pub fn fit_text(font: &MonoFont, text: &str, max_width: u32) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text_width(font, text) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    for cut in (1..=chars.len()).rev() {
        let mut candidate: String = chars[..cut].iter().collect();
        candidate.truncate(candidate.trim_end().len());
        candidate.push_str("...");
        if text_width(font, &candidate) <= max_width {
            return candidate;
        }
    }
    "...".to_string()
}

/// Layout and color parameters shared by all item renderers, derived from
/// the config once per refresh cycle.
#[derive(Debug, Clone)]
pub struct ItemStyle {
    pub panel_height: u32,
    pub card_padding: u32,
    pub logo_gap: u32,
    pub header_logo_size: u32,
    pub header_font: &'static MonoFont<'static>,
    pub body_font: &'static MonoFont<'static>,
    pub header_color: Rgb888,
    pub text_color: Rgb888,
    pub live_color: Rgb888,
    pub finished_color: Rgb888,
    pub upcoming_color: Rgb888,
    pub spread_color: Rgb888,
}

fn rgb888(color: Rgb) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

impl ItemStyle {
    pub fn new(config: &TickerConfig, panel_height: u32) -> Self {
        let font_size = config.layout.font_size.max(5);
        Self {
            panel_height,
            card_padding: config.layout.card_padding,
            logo_gap: config.layout.logo_gap,
            header_logo_size: config.layout.header_logo_size.max(10),
            header_font: font_for_size(font_size),
            // Game-card body text runs two lines, so it drops a couple sizes.
            body_font: font_for_size(font_size.saturating_sub(2).max(4)),
            header_color: rgb888(config.colors.header),
            text_color: rgb888(config.colors.text),
            live_color: rgb888(config.colors.live),
            finished_color: rgb888(config.colors.finished),
            upcoming_color: rgb888(config.colors.upcoming),
            spread_color: rgb888(config.colors.spread),
        }
    }

    /// Game-card logos target ~82% of the panel height.
    pub fn card_logo_size(&self) -> u32 {
        let scaled = (self.panel_height as f32 * 0.82).round() as u32;
        scaled.min(self.panel_height.saturating_sub(2)).max(18)
    }

    fn column_gap(&self) -> u32 {
        (self.logo_gap + 1).max(2)
    }
}

fn centered_y(panel_height: u32, item_height: u32) -> i32 {
    (panel_height.saturating_sub(item_height) / 2) as i32
}

fn draw_text(target: &mut Bitmap, text: &str, x: i32, y: i32, font: &'static MonoFont, color: Rgb888) {
    Text::with_text_style(text, Point::new(x, y), MonoTextStyle::new(font, color), LEFT_ALGN)
        .draw(target)
        .unwrap();
}

fn draw_logo_or_fallback(
    target: &mut Bitmap,
    logo: Option<&Logo>,
    x: i32,
    y: i32,
    size: u32,
    abbr: &str,
    style: &ItemStyle,
) {
    match logo {
        Some(logo) => target.blit_rgba(&logo.pixels, logo.size, logo.size, x, y),
        None => {
            Rectangle::new(Point::new(x, y), Size::new(size, size))
                .into_styled(PrimitiveStyle::with_stroke(style.header_color, 1))
                .draw(target)
                .unwrap();
            let short: String = abbr.chars().take(2).collect::<String>().to_uppercase();
            let tx = x + ((size.saturating_sub(text_width(style.body_font, &short)) / 2) as i32);
            let ty = y + ((size.saturating_sub(text_height(style.body_font)) / 2) as i32);
            draw_text(target, &short, tx, ty, style.body_font, style.header_color);
        }
    }
}

pub fn league_header(style: &ItemStyle, name: &str, logo: Option<&Logo>) -> Bitmap {
    let logo_size = style.header_logo_size;
    let width = (style.card_padding * 2)
        + logo_size
        + style.logo_gap
        + text_width(style.header_font, name);
    let mut item = Bitmap::new(width.max(1), style.panel_height);

    let logo_y = centered_y(style.panel_height, logo_size);
    draw_logo_or_fallback(
        &mut item,
        logo,
        style.card_padding as i32,
        logo_y,
        logo_size,
        name,
        style,
    );

    let text_x = (style.card_padding + logo_size + style.logo_gap) as i32;
    let text_y = centered_y(style.panel_height, text_height(style.header_font));
    draw_text(&mut item, name, text_x, text_y, style.header_font, style.header_color);
    item
}

pub fn section_label(style: &ItemStyle, label: &str) -> Bitmap {
    let width = text_width(style.header_font, label) + style.card_padding * 2;
    let mut item = Bitmap::new(width.max(1), style.panel_height);
    let y = centered_y(style.panel_height, text_height(style.header_font));
    draw_text(&mut item, label, style.card_padding as i32, y, style.header_font, style.header_color);
    item
}

fn decorate_team(abbr: &str, rank: Option<u32>) -> String {
    match rank {
        Some(rank) if rank <= 25 => format!("#{rank} {abbr}"),
        _ => abbr.to_string(),
    }
}

/// The two stacked info-column lines of a game card and their colors.
pub fn info_lines(style: &ItemStyle, game: &GameEntry) -> (String, String, Rgb888, Rgb888) {
    match game.state {
        GameState::Upcoming => (
            game.start_time_compact(),
            game.spread_compact(),
            style.upcoming_color,
            style.spread_color,
        ),
        GameState::Live => {
            let mut top = game.away_score.clone();
            if !game.live_period_label.is_empty() {
                top = format!("{top} {}", game.live_period_label);
            }
            let mut bottom = game.home_score.clone();
            if !game.live_clock.is_empty() {
                bottom = format!("{bottom} {}", game.live_clock);
            }
            (top, bottom, style.live_color, style.live_color)
        }
        GameState::Final => (
            game.away_score.clone(),
            game.home_score.clone(),
            style.finished_color,
            style.finished_color,
        ),
    }
}

pub fn game_card(
    style: &ItemStyle,
    game: &GameEntry,
    away_logo: Option<&Logo>,
    home_logo: Option<&Logo>,
) -> Bitmap {
    let logo_size = style.card_logo_size();
    let column_gap = style.column_gap();
    let font = style.body_font;

    let (away_name, home_name) = match game.state {
        GameState::Live | GameState::Final => (game.away_abbr.clone(), game.home_abbr.clone()),
        GameState::Upcoming => (
            decorate_team(&game.away_abbr, game.away_rank),
            decorate_team(&game.home_abbr, game.home_rank),
        ),
    };

    let (info_top, info_bottom, info_top_color, info_bottom_color) = info_lines(style, game);

    let names_width = text_width(font, &away_name).max(text_width(font, &home_name));
    let info_width = text_width(font, &info_top).max(text_width(font, &info_bottom));
    let at_width = text_width(font, "@");
    let logo_cluster_width = logo_size + style.logo_gap + at_width + style.logo_gap + logo_size;

    let width = (style.card_padding * 2)
        + logo_cluster_width
        + column_gap
        + names_width
        + column_gap
        + info_width;
    let mut item = Bitmap::new(width.max(1), style.panel_height);

    let logo_y = centered_y(style.panel_height, logo_size);
    let away_logo_x = style.card_padding as i32;
    let at_x = away_logo_x + (logo_size + style.logo_gap) as i32;
    let home_logo_x = at_x + (at_width + style.logo_gap) as i32;

    draw_logo_or_fallback(&mut item, away_logo, away_logo_x, logo_y, logo_size, &game.away_abbr, style);
    draw_logo_or_fallback(&mut item, home_logo, home_logo_x, logo_y, logo_size, &game.home_abbr, style);

    let at_y = centered_y(style.panel_height, text_height(font));
    draw_text(&mut item, "@", at_x, at_y, font, style.header_color);

    let line_height = text_height(font);
    let line_gap = (line_height / 4).max(1);
    let block_height = line_height * 2 + line_gap;
    let line1_y = centered_y(style.panel_height, block_height);
    let line2_y = line1_y + (line_height + line_gap) as i32;

    let names_x = (style.card_padding + logo_cluster_width + column_gap) as i32;
    let info_x = names_x + (names_width + column_gap) as i32;

    let away_name = fit_text(font, &away_name, names_width);
    let home_name = fit_text(font, &home_name, names_width);
    let info_top = fit_text(font, &info_top, info_width);
    let info_bottom = fit_text(font, &info_bottom, info_width);

    draw_text(&mut item, &away_name, names_x, line1_y, font, style.text_color);
    draw_text(&mut item, &home_name, names_x, line2_y, font, style.text_color);
    draw_text(&mut item, &info_top, info_x, line1_y, font, info_top_color);
    draw_text(&mut item, &info_bottom, info_x, line2_y, font, info_bottom_color);

    item
}
