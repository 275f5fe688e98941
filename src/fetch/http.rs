use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{self, HeaderMap, HeaderValue};

use super::PageFetcher;
use crate::config::{ScrapeConfig, USER_AGENT};
use crate::html::{content_type_charset, decode_with_charset};
use crate::retry::Backoff;

const TIMEOUT: Duration = Duration::from_secs(10);
const ACTION: &str = "getHistoryData";

/// Session cookies captured from a real browser visit. The endpoint rejects
/// requests that look cookieless.
const COOKIE: &str = "UserId=17492113410185356; Hm_lvt_7c50c7060f1f743bccf8c150a646e90a=1749211341; \
     HMACCCOUNT=54F2FF78AEECB908; Hm_lvt_5326a74bb3e3143580750a123a85e7a1=1749211410; \
     Hm_lpvt_5326a74bb3e3143580750a123a85e7a1=1749212779; \
     Hm_lpvt_7c50c7060f1f743bccf8c150a646e90a=1749212779";

/// POSTs straight to the history endpoint with browser-like headers.
pub struct HttpFetcher {
    client: Client,
    city: String,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Self::with_client_builder(config, Client::builder())
    }

    fn with_client_builder(config: &ScrapeConfig, builder: ClientBuilder) -> Result<Self> {
        let referer = format!("{}/{}/{}01.html", config.base_url, config.city, config.year);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(COOKIE));
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&referer).context("Invalid referer header")?,
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );

        let client = builder
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpFetcher {
            client,
            city: config.city.clone(),
        })
    }

    fn form(&self, url: &str) -> Vec<(&'static str, String)> {
        vec![
            ("city", self.city.clone()),
            ("yearmonth", year_month_from_url(url)),
            ("action", ACTION.to_string()),
            // Cache buster
            ("t", chrono::Utc::now().timestamp_millis().to_string()),
        ]
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let form = self.form(url);
        debug!("POST {} {:?}", url, form);

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?;

        let charset = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(content_type_charset)
            .map(str::to_string);

        let bytes = response.bytes().context("Failed to read response body")?;
        Ok(decode_with_charset(&bytes, charset.as_deref()))
    }

    fn backoff(&self) -> Backoff {
        Backoff::from_secs(2.0, 5.0)
    }
}

/// Last path segment of the URL without its `.html` suffix.
///
/// For the alternate `{year}/{month}.html` layout this is only the month.
pub fn year_month_from_url(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.replace(".html", "")
}
