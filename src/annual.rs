use log::{info, warn};

use crate::fetch::PageFetcher;
use crate::record::DailyRecord;
use crate::retry::{Backoff, Sleeper, attempt};

/// Pause between two months, on top of any retry backoff.
pub fn month_pause() -> Backoff {
    Backoff::from_secs(3.0, 6.0)
}

/// `{base}/{city}/{year}{MM}.html`
pub fn month_url(base_url: &str, city: &str, year: i32, month: u32) -> String {
    format!("{}/{}/{}{:02}.html", base_url.trim_end_matches('/'), city, year, month)
}

/// `{base}/{city}/{year}/{MM}.html`, a layout the site used in the past.
pub fn alt_month_url(base_url: &str, city: &str, year: i32, month: u32) -> String {
    format!("{}/{}/{}/{:02}.html", base_url.trim_end_matches('/'), city, year, month)
}

/// Scrape all twelve months of `year`, in month order. Months that fail on
/// both URL layouts simply contribute nothing.
pub fn scrape_year(
    fetcher: &dyn PageFetcher,
    sleeper: &dyn Sleeper,
    base_url: &str,
    city: &str,
    year: i32,
    max_retries: u32,
) -> Vec<DailyRecord> {
    let mut annual = Vec::new();

    for month in 1..=12 {
        let url = month_url(base_url, city, year, month);
        info!("Scraping {}-{:02}: {}", year, month, url);

        let mut records = attempt(fetcher, sleeper, &url, max_retries);

        if records.is_empty() {
            let alt_url = alt_month_url(base_url, city, year, month);
            warn!("No data for {}-{:02}, trying {}", year, month, alt_url);
            records = attempt(fetcher, sleeper, &alt_url, max_retries);
        }

        info!("Collected {} records for {}-{:02}", records.len(), year, month);
        annual.extend(records);

        if month < 12 {
            let pause = month_pause().pick();
            info!("Waiting {:.2?} before the next month", pause);
            sleeper.sleep(pause);
        }
    }

    annual
}
