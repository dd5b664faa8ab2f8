//! Cup Timer - a single-button three-minute countdown
//! 
//! This library provides the countdown state machine, the tokio runtime that
//! ticks it, the alarm sound collaborator and the HTTP screen that exposes
//! the toggle button.

pub mod config;
pub mod controller;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use controller::CountdownController;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
