//! Pausable fixed-interval tick scheduler for roomdraw.
//!
//! Drives the rolling preview of a draw session. A scheduler is created
//! paused; [`TickScheduler::resume`] arms it and [`TickScheduler::pause`]
//! disarms it. While paused, [`TickScheduler::wait_for_tick`] pends forever,
//! so pausing is an immediate cancellation: no tick fires after `pause`
//! returns.
//!
//! # Integration
//!
//! The scheduler sits inside a session actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         cmd = cmd_rx.recv() => { /* handle commands, maybe pause() */ }
//!         info = scheduler.wait_for_tick() => {
//!             /* build and publish one preview frame */
//!         }
//!     }
//! }
//! ```
//!
//! Time comes from `tokio::time`, so tests can run on a paused clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a tick fires late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Forget the missed ticks and schedule the next one from now.
    #[default]
    Skip,
    /// Keep the original cadence; the next tick is due one interval after
    /// the missed deadline, even if that is already in the past.
    Drop,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Late-tick handling.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// 50 ms, i.e. 20 preview frames per second.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    /// Shortest interval accepted by [`validated`](Self::validated).
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Raises intervals below [`Self::MIN_INTERVAL`] to the minimum.
    ///
    /// Called by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_us = self.interval.as_micros() as u64,
                "tick interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonic tick number over the scheduler's lifetime, starting at 1.
    pub tick: u64,
    /// `true` if the tick woke more than 10% of an interval late.
    pub overrun: bool,
    /// Whole intervals missed before this tick (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// Deadline of the next tick; `None` while paused.
    next_tick: Option<Instant>,
    total_overruns: u64,
}

impl TickScheduler {
    /// Creates a paused scheduler.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            interval_ms = config.interval.as_secs_f64() * 1000.0,
            policy = ?config.policy,
            "tick scheduler created"
        );
        Self {
            config,
            tick_count: 0,
            next_tick: None,
            total_overruns: 0,
        }
    }

    /// Waits for the next tick.
    ///
    /// Pends forever while paused; inside `select!` the other branches keep
    /// running. Cancel-safe: dropping the future loses no state.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(deadline) = self.next_tick else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline).await;

        let now = Instant::now();
        let interval = self.config.interval;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(deadline);
        let overrun = late_by > interval / 10;
        let mut ticks_skipped = 0;

        self.next_tick = Some(match self.config.policy {
            TickPolicy::Skip => {
                if overrun {
                    ticks_skipped = (late_by.as_nanos() / interval.as_nanos()) as u64;
                    if ticks_skipped > 0 {
                        warn!(
                            tick = self.tick_count,
                            skipped = ticks_skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "tick overrun, skipping ahead"
                        );
                    }
                }
                now + interval
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun, keeping original cadence"
                    );
                }
                deadline + interval
            }
        });

        if overrun {
            self.total_overruns += 1;
        }

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Disarms the scheduler. Idempotent.
    pub fn pause(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(tick = self.tick_count, "tick scheduler paused");
        }
    }

    /// Arms the scheduler; the next tick is due one interval from now.
    /// Idempotent: resuming a running scheduler keeps its deadline.
    pub fn resume(&mut self) {
        if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.config.interval);
            debug!(tick = self.tick_count, "tick scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.next_tick.is_none()
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Late ticks observed so far.
    pub fn total_overruns(&self) -> u64 {
        self.total_overruns
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }
}
