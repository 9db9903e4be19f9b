// Library exports for the Pathbound Snake bot
// This allows integration tests to use the core decision logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod grid;
pub mod search;
pub mod strategy;
pub mod types;
