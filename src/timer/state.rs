//! Timer state structure and display helpers

use serde::{Deserialize, Serialize};

/// Full Pomodoro duration: 25 minutes in milliseconds
pub const INITIAL_MS: u64 = 25 * 60 * 1000;

/// Fixed step removed from the remaining time on every tick
pub const TICK_MS: u64 = 1000;

/// Format milliseconds as `MM:SS`, truncating sub-second remainders
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Logical phase of the countdown, derived from `TimerState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Expired,
}

impl Phase {
    /// Label of the primary (start/pause) button for this phase
    pub fn primary_label(&self) -> &'static str {
        match self {
            Phase::Idle => "Start",
            Phase::Running => "Pause",
            Phase::Expired => "Restart",
        }
    }
}

/// Remaining time and running flag of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_ms: u64,
    pub is_running: bool,
}

impl TimerState {
    /// Create the mount-time state: full duration, not running
    pub fn new() -> Self {
        Self {
            remaining_ms: INITIAL_MS,
            is_running: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.remaining_ms == 0 {
            Phase::Expired
        } else {
            Phase::Idle
        }
    }

    /// Remaining time as shown on the display label
    pub fn display(&self) -> String {
        format_time(self.remaining_ms)
    }

    /// Build the render snapshot for this state
    pub fn view(&self) -> TimerView {
        let phase = self.phase();
        TimerView {
            remaining_ms: self.remaining_ms,
            is_running: self.is_running,
            phase,
            display: self.display(),
            primary_label: phase.primary_label().to_string(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the page needs to render the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_ms: u64,
    pub is_running: bool,
    pub phase: Phase,
    pub display: String,
    pub primary_label: String,
}

impl Default for TimerView {
    fn default() -> Self {
        TimerState::new().view()
    }
}
