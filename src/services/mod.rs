//! External collaborator module
//! 
//! This module contains the sound resource that plays the alarm when the
//! countdown finishes.

pub mod alarm;

// Re-export main types
pub use alarm::*;
