//! Scheduler for the periodic expiry sweep.
//!
//! Reads already report expired auctions as completed, so the sweep only
//! brings the stored status in line. The scheduler aligns each run to a
//! fixed grid anchored at `from`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{Instrument as _, Level, event, span};

/// Configuration for scheduling the periodic expiry sweep.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scheduler {
    /// An RFC3339 timestamp to anchor the schedule to (if omitted, defaults to now)
    #[serde(with = "time::serde::rfc3339::option")]
    pub from: Option<time::OffsetDateTime>,
    /// How often to sweep
    #[serde(with = "humantime_serde::option")]
    pub every: Option<Duration>,
}

impl Scheduler {
    /// Run `f` at every tick of the schedule, passing the scheduled time.
    ///
    /// The first run happens at the earliest grid point at or after now.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if scheduling is disabled (no interval configured)
    /// * `Err(E)` as soon as a run of `f` fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use acpdemo::Scheduler;
    ///
    /// # fn main() -> Result<(), String> {
    /// let scheduler = Scheduler {
    ///     from: None,
    ///     every: Some(Duration::from_secs(60)),
    /// };
    ///
    /// # tokio_test::block_on(async {
    /// scheduler.schedule(|timestamp| async move {
    ///     println!("Sweeping at {}", timestamp);
    ///     Ok::<(), String>(())
    /// }).await?;
    /// # Ok(())
    /// # })
    /// # }
    /// ```
    pub async fn schedule<T, E>(
        &self,
        f: impl AsyncFn(OffsetDateTime) -> Result<T, E>,
    ) -> Result<(), E> {
        let Some(delta) = self.every.filter(|delta| !delta.is_zero()) else {
            return Ok(());
        };

        let now = OffsetDateTime::now_utc();
        let mut anchor = self.first_run(now, delta);

        // align to the grid before starting the interval
        let sleepy: Duration = (anchor - now).try_into().unwrap_or_default();
        tokio::time::sleep(sleepy).await;

        let mut interval = tokio::time::interval(delta);

        loop {
            interval.tick().await;

            let span = span!(Level::INFO, "running scheduled sweep");
            async {
                event!(
                    Level::INFO,
                    sweep_time = anchor.format(&Rfc3339).unwrap_or_default()
                );
                f(anchor).await
            }
            .instrument(span)
            .await?;

            anchor += delta;
        }
    }

    /// The earliest point on the schedule's grid at or after `now`.
    fn first_run(&self, now: OffsetDateTime, delta: Duration) -> OffsetDateTime {
        match self.from {
            Some(mut from) if from < now => {
                let steps = ((now - from) / delta).ceil() as u32;
                from += delta * steps;
                from
            }
            Some(from) => from,
            None => now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_first_run_snaps_to_grid() {
        let scheduler = Scheduler {
            from: Some(datetime!(2025-01-01 00:00:00 UTC)),
            every: Some(Duration::from_secs(60)),
        };
        let now = datetime!(2025-01-01 00:10:30 UTC);
        assert_eq!(
            scheduler.first_run(now, Duration::from_secs(60)),
            datetime!(2025-01-01 00:11:00 UTC)
        );
    }

    #[test]
    fn test_first_run_keeps_future_anchor() {
        let from = datetime!(2030-01-01 00:00:00 UTC);
        let scheduler = Scheduler {
            from: Some(from),
            every: Some(Duration::from_secs(60)),
        };
        let now = datetime!(2025-01-01 00:00:00 UTC);
        assert_eq!(scheduler.first_run(now, Duration::from_secs(60)), from);
    }

    #[tokio::test]
    async fn test_disabled_schedule_returns_immediately() {
        let scheduler = Scheduler::default();
        let result = scheduler
            .schedule(async |_| Err::<(), &str>("should never run"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failure_stops_the_schedule() {
        let scheduler = Scheduler {
            from: None,
            every: Some(Duration::from_millis(5)),
        };
        let result = scheduler
            .schedule(async |_| Err::<(), &str>("storage unavailable"))
            .await;
        assert_eq!(result, Err("storage unavailable"));
    }
}
