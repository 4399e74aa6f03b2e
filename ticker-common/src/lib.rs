pub mod classify;
pub mod config;
pub mod filters;
pub mod game;
pub mod league;
pub mod scoreboard;

pub mod panel_support {
    pub const DEFAULT_PANEL_WIDTH: u32 = 128;
    pub const DEFAULT_PANEL_HEIGHT: u32 = 32;
}
