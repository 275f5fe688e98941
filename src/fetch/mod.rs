//! Page retrieval strategies.

use anyhow::Result;

use crate::config::{FetchStrategy, ScrapeConfig};
use crate::retry::Backoff;

pub mod browser;
pub mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// Something that can turn a URL into page markup.
///
/// An `Err` means the page could not be retrieved at all; an `Ok` with a page
/// that happens to hold no data is still a successful fetch.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;

    /// Range the retry wrapper draws its wait from between attempts.
    fn backoff(&self) -> Backoff;
}

/// Pick the fetcher for the configured strategy.
pub fn build_fetcher(config: &ScrapeConfig) -> Result<Box<dyn PageFetcher>> {
    Ok(match config.strategy {
        FetchStrategy::Browser => Box::new(BrowserFetcher::new(config.render_wait)),
        FetchStrategy::Http => Box::new(HttpFetcher::new(config)?),
    })
}
