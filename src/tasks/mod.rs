//! Background tasks module
//! 
//! This module contains the tokio tasks that drive the countdown while it runs.

pub mod ticker;

// Re-export main types
pub use ticker::TokioTicker;
