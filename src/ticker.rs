use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::utils::clock::Clock;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Publishes the current wall-clock time once per interval over a watch
/// channel. Consumers subscribe through the receiver handed out by [new].
/// Cancelling the token ends the loop; the sender is dropped with it, which
/// signals subscribers that no further updates will come.
///
/// [new]: Ticker::new
pub struct Ticker {
    sender: watch::Sender<DateTime<Utc>>,
    shutdown: CancellationToken,
    interval: Duration,
    clock: Box<dyn Clock>,
}

impl Ticker {
    pub fn new(
        shutdown: CancellationToken,
        interval: Duration,
        clock: Box<dyn Clock>,
    ) -> (Self, watch::Receiver<DateTime<Utc>>) {
        let (sender, receiver) = watch::channel(clock.time());
        (
            Self {
                sender,
                shutdown,
                interval,
                clock,
            },
            receiver,
        )
    }

    /// Executes the ticker event loop. Scheduling is anchored to the loop
    /// start, so a slow frame doesn't shift every later tick.
    pub async fn run(self) -> Result<()> {
        let mut tick_point = self.clock.instant();
        loop {
            tick_point += self.interval;

            // Receivers come and go with the view. A publish with nobody
            // listening is not a reason to stop ticking.
            let _ = self.sender.send(self.clock.time());

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("Ticker stopped");
                    return Ok(());
                }
                _ = self.clock.sleep_until(tick_point) => ()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use tokio_util::sync::CancellationToken;

    use crate::utils::clock::DefaultClock;

    use super::Ticker;

    #[tokio::test(start_paused = true)]
    async fn publishes_once_per_interval_until_cancelled() -> Result<()> {
        let shutdown = CancellationToken::new();
        let (ticker, mut ticks) =
            Ticker::new(shutdown.clone(), Duration::from_secs(1), Box::new(DefaultClock));

        let handle = tokio::spawn(ticker.run());

        for _ in 0..3 {
            ticks.changed().await?;
        }

        shutdown.cancel();
        handle.await??;

        // The sender is gone, subscribers see the channel close.
        ticks.mark_unchanged();
        assert!(ticks.changed().await.is_err());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_first_sleep_still_stops() -> Result<()> {
        let shutdown = CancellationToken::new();
        let (ticker, _ticks) =
            Ticker::new(shutdown.clone(), Duration::from_secs(1), Box::new(DefaultClock));

        shutdown.cancel();
        ticker.run().await?;
        Ok(())
    }
}
