//! Background tasks module
//! 
//! This module contains the tick scheduler and the tasks that run alongside
//! the HTTP server.

pub mod countdown_tick;
pub mod display_logger;
pub mod ticker;

// Re-export main functions
pub use countdown_tick::countdown_tick_task;
pub use display_logger::display_logger_task;
pub use ticker::{Tick, TokioTickHandle, TokioTickScheduler};
