//! Countdown timer module
//! 
//! This module contains the timer data model and the state machine that drives it.
//! Nothing in here knows about tokio or HTTP; the tick source is plugged in
//! through the `TickScheduler` trait.

pub mod state;
pub mod countdown;

// Re-export main types
pub use state::{format_time, Phase, TimerState, TimerView, INITIAL_MS, TICK_MS};
pub use countdown::{CountdownTimer, TickScheduler};
