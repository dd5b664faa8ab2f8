//! State management module
//! 
//! This module contains the countdown snapshot types and the shared
//! application state that owns the running controller.

pub mod countdown_state;
pub mod app_state;

// Re-export main types
pub use countdown_state::{format_remaining, ButtonIcon, CountdownState, INITIAL_MILLIS};
pub use app_state::{AppState, AppController, CountdownSnapshot, DisplayChannel};
