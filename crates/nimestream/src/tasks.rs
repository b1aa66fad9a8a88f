//! Cancellable scheduled tasks.
//!
//! A [`ScheduledTask`] is a handle to a spawned tokio task. Dropping the handle
//! aborts the task, so a screen that owns its timers stops them simply by being
//! dropped. Must be created inside a tokio runtime.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug)]
pub struct ScheduledTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `tick` every `period`, first after one full period
    ///
    /// A zero period disables the task; `tick` never runs.
    pub fn every<F>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        if period.is_zero() {
            return Self::disabled(name);
        }

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        });

        debug!(task = name, period_ms = period.as_millis() as u64, "Scheduled recurring task");
        Self { name, handle }
    }

    /// Run `fire` once after `delay`; a zero delay disables the task
    pub fn after<F>(name: &'static str, delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        if delay.is_zero() {
            return Self::disabled(name);
        }

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            fire();
        });

        debug!(task = name, delay_ms = delay.as_millis() as u64, "Scheduled one-shot task");
        Self { name, handle }
    }

    fn disabled(name: &'static str) -> Self {
        debug!(task = name, "Scheduled task disabled");
        Self {
            name,
            handle: tokio::spawn(async {}),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True once a one-shot task has fired or the task was aborted
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the task now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            debug!(task = self.name, "Cancelled scheduled task");
        }
    }
}
