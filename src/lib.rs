pub mod actor;
pub mod api;
pub mod blueprint;
pub mod config;
pub mod economy;
pub mod error;
pub mod game;
pub mod instrumentation;
