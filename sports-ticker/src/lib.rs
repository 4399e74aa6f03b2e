pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logos;
pub mod plugin;
pub mod sim;
