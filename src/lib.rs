//! Pomodoro Widget - a 25-minute countdown timer served to the browser
//! 
//! This library provides the countdown state machine, the tokio tick source
//! that drives it and the HTTP surface that renders it as a web widget.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{format_time, CountdownTimer, TickScheduler, TimerState, TimerView};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
