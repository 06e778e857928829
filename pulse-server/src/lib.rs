// Library exports for pulse-server
// This allows integration tests and other crates to use pulse-server modules

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod refresh;
pub mod relay;
pub mod roster;
pub mod session;
pub mod state;
pub mod static_files;
