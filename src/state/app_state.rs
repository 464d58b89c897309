//! Mounted widget state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    tasks::TokioTicker,
    timer::{CountdownTimer, TimerState, TimerView},
};

/// One mounted countdown widget
///
/// Owns the countdown behind a mutex so HTTP handlers and the tick task apply
/// their updates one at a time, and publishes a `TimerView` after every change.
#[derive(Debug)]
pub struct AppState {
    /// Countdown state machine and its tick registration
    countdown: Mutex<CountdownTimer<TokioTicker>>,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for render updates
    pub view_tx: watch::Sender<TimerView>,
    /// Keep the receiver alive to prevent channel closure
    _view_rx: watch::Receiver<TimerView>,
}

impl AppState {
    /// Mount a new widget: full duration, idle, nothing scheduled
    pub fn mount() -> Arc<Self> {
        let (view_tx, view_rx) = watch::channel(TimerView::default());

        Arc::new_cyclic(|weak| Self {
            countdown: Mutex::new(CountdownTimer::new(TokioTicker::new(weak.clone()))),
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            view_tx,
            _view_rx: view_rx,
        })
    }

    /// Apply a transition to the countdown and publish the resulting view
    fn apply<F>(&self, action: Option<&str>, transition: F) -> Result<TimerView, String>
    where
        F: FnOnce(&mut CountdownTimer<TokioTicker>) -> TimerState,
    {
        let mut countdown = self.countdown.lock()
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        let view = transition(&mut *countdown).view();

        // Publish under the lock so watchers see updates in transition order.
        if let Err(e) = self.view_tx.send(view.clone()) {
            warn!("Failed to send timer view update: {}", e);
        }
        drop(countdown);

        if let Some(action) = action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        Ok(view)
    }

    /// Start button: run the countdown, restarting it if it expired
    pub fn start(&self) -> Result<TimerView, String> {
        self.apply(Some("start"), |countdown| countdown.start())
    }

    /// Pause button: freeze the remaining time
    pub fn pause(&self) -> Result<TimerView, String> {
        self.apply(Some("pause"), |countdown| countdown.pause())
    }

    /// Reset button: stop and return to the full duration
    pub fn reset(&self) -> Result<TimerView, String> {
        self.apply(Some("reset"), |countdown| countdown.reset())
    }

    /// Primary button: pause while running, otherwise start
    pub fn toggle(&self) -> Result<TimerView, String> {
        self.apply(Some("toggle"), |countdown| countdown.toggle())
    }

    /// Apply one tick from the tick task registered under `generation`
    pub fn tick(&self, generation: u64) -> Result<TimerView, String> {
        self.apply(None, |countdown| countdown.tick(generation))
    }

    /// Unmount the widget: cancel any tick registration unconditionally
    pub fn teardown(&self) -> Result<(), String> {
        let mut countdown = self.countdown.lock()
            .map_err(|e| format!("Failed to lock countdown: {}", e))?;

        countdown.teardown();
        info!("Widget torn down");
        Ok(())
    }

    /// Get the current render snapshot
    pub fn get_view(&self) -> Result<TimerView, String> {
        self.countdown.lock()
            .map(|countdown| countdown.state().view())
            .map_err(|e| format!("Failed to lock countdown: {}", e))
    }

    /// Whether a tick task is currently registered
    pub fn is_ticking(&self) -> Result<bool, String> {
        self.countdown.lock()
            .map(|countdown| countdown.has_registration())
            .map_err(|e| format!("Failed to lock countdown: {}", e))
    }

    /// Subscribe to view updates
    pub fn subscribe(&self) -> watch::Receiver<TimerView> {
        self.view_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::timer::{Phase, INITIAL_MS};

    #[tokio::test(start_paused = true)]
    async fn five_seconds_then_pause_reads_24_55() {
        let state = AppState::mount();
        state.start().unwrap();

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        let view = state.pause().unwrap();

        assert_eq!(view.remaining_ms, 1_495_000);
        assert_eq!(view.display, "24:55");
        assert!(!state.is_ticking().unwrap());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state.get_view().unwrap().remaining_ms, 1_495_000);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_expiry() {
        let state = AppState::mount();
        state.start().unwrap();

        tokio::time::sleep(Duration::from_millis(1_500_500)).await;
        let view = state.get_view().unwrap();

        assert_eq!(view.remaining_ms, 0);
        assert_eq!(view.phase, Phase::Expired);
        assert_eq!(view.primary_label, "Restart");
        assert!(!state.is_ticking().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_ticking() {
        let state = AppState::mount();
        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        state.teardown().unwrap();
        assert!(!state.is_ticking().unwrap());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.get_view().unwrap().remaining_ms, INITIAL_MS - 2_000);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_from_full_duration() {
        let state = AppState::mount();
        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let view = state.reset().unwrap();
        assert_eq!(view.remaining_ms, INITIAL_MS);
        assert!(!view.is_running);

        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(state.get_view().unwrap().remaining_ms, INITIAL_MS - 1_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn tick_blocked_across_reset_does_not_hit_new_run() {
        let state = AppState::mount();
        state.start().unwrap();

        {
            // Hold the lock past the first tick so the tick task blocks on it,
            // then restart the run while it waits.
            let mut countdown = state.countdown.lock().unwrap();
            std::thread::sleep(Duration::from_millis(1_300));
            countdown.reset();
            countdown.start();
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        let view = state.get_view().unwrap();
        assert_eq!(view.remaining_ms, INITIAL_MS);
        assert!(view.is_running);

        state.teardown().unwrap();
    }

    #[tokio::test]
    async fn actions_publish_views_and_record_last_action() {
        let state = AppState::mount();
        let mut rx = state.subscribe();

        state.toggle().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().primary_label, "Pause");

        state.toggle().unwrap();
        assert_eq!(rx.borrow_and_update().primary_label, "Start");

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("toggle"));
        assert!(time.is_some());
    }
}
