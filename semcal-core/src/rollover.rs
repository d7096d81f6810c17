//! Background watcher that notices when the date changes.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::controller::Clock;

/// Handle of a running watcher. Dropping it stops the watcher.
#[derive(Debug)]
pub struct RolloverWatch {
    handle: JoinHandle<()>,
}

impl RolloverWatch {
    /// Poll `clock` every `interval` and send the new date whenever it
    /// differs from the last one seen, starting from `today`.
    ///
    /// The watcher also ends on its own once the receiver is dropped.
    pub fn spawn(
        clock: Arc<dyn Clock>,
        interval: Duration,
        today: NaiveDate,
    ) -> (Self, mpsc::Receiver<NaiveDate>) {
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seen = today;
            loop {
                ticker.tick().await;
                let current = clock.now().date();
                if current == seen {
                    continue;
                }
                debug!(from = %seen, to = %current, "rollover");
                seen = current;
                if tx.send(current).await.is_err() {
                    break;
                }
            }
        });
        (RolloverWatch { handle }, rx)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RolloverWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
