use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// One reading of the clock shared by everything drawn in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub seq: u64,
    pub now: DateTime<Local>,
}

/// Publishes a [`Tick`] every period to whoever subscribed.
pub struct Clock {
    source: Arc<dyn TimeSource>,
    tx: watch::Sender<Tick>,
}

impl Clock {
    pub fn new(source: Arc<dyn TimeSource>) -> Self {
        let first = Tick {
            seq: 0,
            now: source.now(),
        };
        let (tx, _) = watch::channel(first);
        Self { source, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Tick {
        *self.tx.borrow()
    }

    /// Runs until every subscriber is gone.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and `new` already
            // published that reading.
            interval.tick().await;

            let mut seq = 0;
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = self.tx.closed() => break,
                }
                seq += 1;
                let tick = Tick {
                    seq,
                    now: self.source.now(),
                };
                if self.tx.send(tick).is_err() {
                    break;
                }
            }
            debug!("clock stopped: no subscribers left");
        })
    }
}
