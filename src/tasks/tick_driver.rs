//! Periodic tick that counts every court down

use std::{fmt, sync::Arc, time::Duration};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Default time between ticks
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(250);

/// A delta this many periods long is logged as a stall
const STALL_FACTOR: u64 = 4;

/// Where the tick driver reads wall-clock time from
pub trait TimeSource: fmt::Debug + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// The system's real-time clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Measures wall-clock time elapsed between ticks.
///
/// Wall-clock time keeps advancing while the machine sleeps, so a warmup
/// still runs out during a suspend. Only whole milliseconds are handed out;
/// the remainder stays on the clock and is paid out on a later tick.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    last_tick: DateTime<Utc>,
}

impl TickClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { last_tick: start }
    }

    /// Milliseconds elapsed since the last call, advancing the clock by that much.
    ///
    /// If the wall clock stepped backwards the delta is 0 and measuring
    /// restarts from `now`.
    pub fn elapsed_ms(&mut self, now: DateTime<Utc>) -> u64 {
        let elapsed = now.signed_duration_since(self.last_tick);
        if elapsed < TimeDelta::zero() {
            warn!("Wall clock stepped back by {}ms", -elapsed.num_milliseconds());
            self.last_tick = now;
            return 0;
        }

        let delta_ms = elapsed.num_milliseconds();
        self.last_tick += TimeDelta::milliseconds(delta_ms);
        u64::try_from(delta_ms).unwrap_or(0)
    }
}

/// Drives [`AppState::tick`] on a fixed period
#[derive(Debug)]
pub struct TickDriver {
    state: Arc<AppState>,
    period: Duration,
    time_source: Arc<dyn TimeSource>,
}

/// Handle to a running [`TickDriver`]
#[derive(Debug)]
pub struct TickDriverHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickDriver {
    pub fn new(state: Arc<AppState>, period: Duration) -> Self {
        Self {
            state,
            period: period.max(Duration::from_millis(1)),
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Measure elapsed time with `time_source` instead of the system clock
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Spawn the tick loop on the current runtime
    pub fn start(self) -> TickDriverHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(stop_rx));
        TickDriverHandle { stop_tx, task }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        info!("Starting tick driver with a {}ms period", self.period.as_millis());

        let stall_ms = u64::try_from(self.period.as_millis())
            .unwrap_or(u64::MAX)
            .saturating_mul(STALL_FACTOR);
        let mut ticks = interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut clock = TickClock::new(self.time_source.now());

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let delta_ms = clock.elapsed_ms(self.time_source.now());
                    if delta_ms > stall_ms {
                        info!("Tick arrived {}ms after the previous one, catching up", delta_ms);
                    }

                    if let Err(e) = self.state.tick(delta_ms) {
                        error!("Failed to apply tick: {}", e);
                    }
                }

                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("Tick driver stopped");
    }
}

impl TickDriverHandle {
    /// Stop the tick loop and wait for it to finish
    pub async fn stop(self) {
        if self.stop_tx.send(true).is_err() {
            debug!("Tick driver already gone");
        }
        if let Err(e) = self.task.await {
            warn!("Tick driver task ended abnormally: {}", e);
        }
    }
}
