pub mod config;
pub mod host;
pub mod menu;
pub mod platform;
