//! Countdown state machine
//!
//! `CountdownTimer` owns the `TimerState` and the tick registration. Every
//! transition out of the running state goes through `cancel_tick`, so at most
//! one registration exists and none outlives the running state.
//!
//! Each registration carries a generation number and every tick reports the
//! generation it was scheduled under. Cancelling a tick source is not always
//! immediate, so ticks from any generation but the live one are dropped.

use std::{fmt, time::Duration};
use tracing::{debug, info};

use super::state::{TimerState, INITIAL_MS, TICK_MS};

/// Source of periodic tick callbacks
///
/// `schedule` starts delivering ticks every `period`, each tagged with
/// `generation`, and returns the handle of the registration; `cancel` stops
/// that registration.
pub trait TickScheduler {
    type Handle;

    fn schedule(&self, period: Duration, generation: u64) -> Self::Handle;

    fn cancel(&self, handle: Self::Handle);
}

/// 25-minute countdown driven by an external tick source
pub struct CountdownTimer<S: TickScheduler> {
    state: TimerState,
    registration: Option<S::Handle>,
    /// Generation of the most recent registration
    generation: u64,
    scheduler: S,
}

impl<S: TickScheduler> CountdownTimer<S> {
    /// Mount a new timer: full duration, idle, nothing scheduled
    pub fn new(scheduler: S) -> Self {
        Self {
            state: TimerState::new(),
            registration: None,
            generation: 0,
            scheduler,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether a tick registration is currently held
    pub fn has_registration(&self) -> bool {
        self.registration.is_some()
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Start counting down. Restarts from the full duration when expired.
    pub fn start(&mut self) -> TimerState {
        if self.state.remaining_ms == 0 {
            info!("Timer expired, restarting from full duration");
            self.state.remaining_ms = INITIAL_MS;
        }

        if !self.state.is_running {
            self.state.is_running = true;
            self.generation += 1;
            self.registration = Some(
                self.scheduler.schedule(Duration::from_millis(TICK_MS), self.generation),
            );
            info!("Timer started with {}ms remaining (generation {})",
                  self.state.remaining_ms, self.generation);
        }

        self.state
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&mut self) -> TimerState {
        if self.state.is_running {
            self.state.is_running = false;
            self.cancel_tick();
            info!("Timer paused with {}ms remaining", self.state.remaining_ms);
        }

        self.state
    }

    /// Stop and go back to the full duration, from any state
    pub fn reset(&mut self) -> TimerState {
        self.cancel_tick();
        self.state = TimerState::new();
        info!("Timer reset");
        self.state
    }

    /// Primary button action: pause while running, otherwise start
    pub fn toggle(&mut self) -> TimerState {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Handle one tick from the registration of `generation`
    ///
    /// Always removes exactly `TICK_MS`, no matter how late the tick fired.
    /// A tick that arrives after the timer stopped running, or that belongs to
    /// an earlier registration, is ignored.
    pub fn tick(&mut self, generation: u64) -> TimerState {
        if !self.state.is_running || self.registration.is_none() {
            debug!("Ignoring tick while not running");
            return self.state;
        }
        if generation != self.generation {
            debug!("Ignoring stale tick from generation {} (live {})", generation, self.generation);
            return self.state;
        }

        match self.state.remaining_ms.checked_sub(TICK_MS) {
            Some(remaining) if remaining > 0 => {
                self.state.remaining_ms = remaining;
                debug!("Tick: {}ms remaining", remaining);
            }
            _ => {
                self.state.remaining_ms = 0;
                self.state.is_running = false;
                self.cancel_tick();
                info!("Timer expired");
            }
        }

        self.state
    }

    /// Release the tick registration regardless of state (widget unmount)
    ///
    /// The running flag is cleared too so the state stays consistent with
    /// having no registration.
    pub fn teardown(&mut self) {
        if self.registration.is_some() {
            debug!("Tearing down timer with an active tick registration");
        }
        self.cancel_tick();
        self.state.is_running = false;
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.registration.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: TickScheduler> fmt::Debug for CountdownTimer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("state", &self.state)
            .field("registered", &self.registration.is_some())
            .finish()
    }
}

impl<S: TickScheduler> Drop for CountdownTimer<S> {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}
