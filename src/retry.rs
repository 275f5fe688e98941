use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use rand::Rng;

use crate::extract::extract_records;
use crate::fetch::PageFetcher;
use crate::record::MonthResult;

/// Uniform random wait between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub min: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn from_secs(min: f64, max: f64) -> Self {
        Backoff {
            min: Duration::from_secs_f64(min),
            max: Duration::from_secs_f64(max),
        }
    }

    /// Draw a delay. A reversed range collapses to `min`.
    pub fn pick(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Blocking wait, swappable so tests can observe it instead of sleeping.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Fetch and extract one month page, retrying fetch/parse errors.
///
/// Returns as soon as one attempt completes without error, even when the
/// page held no records. Exhausting all attempts yields an empty result.
pub fn attempt(
    fetcher: &dyn PageFetcher,
    sleeper: &dyn Sleeper,
    url: &str,
    max_retries: u32,
) -> MonthResult {
    for attempt in 0..max_retries {
        info!("Fetching {} (attempt {}/{})", url, attempt + 1, max_retries);

        let result = fetcher.fetch(url).and_then(|markup| extract_records(&markup));

        match result {
            Ok(records) => {
                if records.is_empty() {
                    warn!("No data found at {}", url);
                } else {
                    info!("Got {} records from {}", records.len(), url);
                }
                return records;
            }
            Err(e) if attempt + 1 < max_retries => {
                let delay = fetcher.backoff().pick();
                warn!("Error fetching {} ({:#}), retrying in {:.2?}", url, e, delay);
                sleeper.sleep(delay);
            }
            Err(e) => {
                error!("Giving up on {} after {} attempts: {:#}", url, max_retries, e);
            }
        }
    }

    Vec::new()
}
