//! Tokio-backed tick source for the countdown

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::{state::AppState, timer::TickScheduler};

/// Schedules ticks as tokio interval tasks that call back into the widget
///
/// The task only holds a `Weak` reference, so an unmounted widget is never
/// ticked.
#[derive(Debug, Clone)]
pub struct TokioTicker {
    target: Weak<AppState>,
}

impl TokioTicker {
    pub fn new(target: Weak<AppState>) -> Self {
        Self { target }
    }
}

impl TickScheduler for TokioTicker {
    type Handle = JoinHandle<()>;

    fn schedule(&self, period: Duration, generation: u64) -> JoinHandle<()> {
        debug!("Scheduling tick task every {:?} (generation {})", period, generation);
        tokio::spawn(ticker_task(self.target.clone(), period, generation))
    }

    fn cancel(&self, handle: JoinHandle<()>) {
        debug!("Cancelling tick task");
        handle.abort();
    }
}

/// Background task that fires one tick per period until cancelled
///
/// Abort only lands at the next `.await`, so a tick already waiting on the
/// widget lock can still be delivered; its `generation` lets the countdown
/// drop it if a newer registration has taken over.
async fn ticker_task(target: Weak<AppState>, period: Duration, generation: u64) {
    // First tick lands one full period after scheduling, like a browser interval.
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(state) = target.upgrade() else {
            debug!("Widget unmounted, stopping tick task");
            break;
        };

        match state.tick(generation) {
            Ok(view) if !view.is_running => {
                debug!("Timer no longer running, stopping tick task");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to apply tick: {}", e);
                break;
            }
        }
    }
}
