//! Scrapes a year of daily weather history for one city and writes it as CSV.

pub mod annual;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod prompt;
pub mod record;
pub mod retry;
pub mod selector;
pub mod writer;

pub use annual::scrape_year;
pub use config::{FetchStrategy, ScrapeConfig};
pub use extract::extract_records;
pub use fetch::{PageFetcher, build_fetcher};
pub use record::DailyRecord;
pub use retry::{Backoff, Sleeper, ThreadSleeper, attempt};
pub use writer::save_annual_data;
