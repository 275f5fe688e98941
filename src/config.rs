use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

pub const DEFAULT_CITY: &str = "sanya";
pub const DEFAULT_YEAR: i32 = 2012;
pub const DEFAULT_BASE_URL: &str = "http://lishi.tianqi.com";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Seconds the browser sits on a page before reading it back.
pub const DEFAULT_RENDER_WAIT_SECS: u64 = 35;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// How month pages are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchStrategy {
    /// Render the page in a headless Chrome session.
    Browser,
    /// POST directly to the history endpoint.
    Http,
}

/// Everything a scrape run needs to know.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub city: String,
    pub year: i32,
    pub base_url: String,
    pub strategy: FetchStrategy,
    pub max_retries: u32,
    pub render_wait: Duration,
    pub output: PathBuf,
}

impl ScrapeConfig {
    /// `{city}_{year}_weather.csv`
    pub fn default_output(city: &str, year: i32) -> PathBuf {
        PathBuf::from(format!("{}_{}_weather.csv", city, year))
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            city: DEFAULT_CITY.to_string(),
            year: DEFAULT_YEAR,
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy: FetchStrategy::Browser,
            max_retries: DEFAULT_MAX_RETRIES,
            render_wait: Duration::from_secs(DEFAULT_RENDER_WAIT_SECS),
            output: ScrapeConfig::default_output(DEFAULT_CITY, DEFAULT_YEAR),
        }
    }
}
