//! State management module
//! 
//! This module contains the mounted widget and the channels it publishes on.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
