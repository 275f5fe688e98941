use std::ffi::OsStr;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info};

use super::PageFetcher;
use crate::config::USER_AGENT;
use crate::retry::Backoff;

/// Structural locator of the "load more" control under the day list.
pub const LOAD_MORE_XPATH: &str = "/html/body/div[7]/div[1]/div[4]/ul/div";

const LOAD_MORE_TIMEOUT: Duration = Duration::from_secs(5);
const AFTER_CLICK_WAIT: Duration = Duration::from_secs(3);
const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Renders pages in a fresh headless Chrome per fetch.
///
/// The page is given a fixed `render_wait` to finish its client-side
/// rendering. Nothing on the page signals completion, so this is a guess that
/// may need tuning when the site gets slower.
pub struct BrowserFetcher {
    render_wait: Duration,
}

impl BrowserFetcher {
    pub fn new(render_wait: Duration) -> Self {
        BrowserFetcher { render_wait }
    }

    fn click_load_more(&self, tab: &Tab) {
        let clicked = tab
            .wait_for_xpath_with_custom_timeout(LOAD_MORE_XPATH, LOAD_MORE_TIMEOUT)
            .and_then(|button| {
                button.click()?;
                Ok(())
            });

        match clicked {
            Ok(()) => {
                info!("Clicked the 'load more' control");
                thread::sleep(AFTER_CLICK_WAIT);
            }
            Err(e) => debug!("No 'load more' control to click: {}", e),
        }
    }
}

impl PageFetcher for BrowserFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let session = BrowserSession::launch(self.render_wait)?;
        let tab = session.browser.new_tab()?;

        tab.navigate_to(url)?;
        tab.wait_until_navigated()?;

        debug!("Waiting {:?} for {} to render", self.render_wait, url);
        thread::sleep(self.render_wait);

        self.click_load_more(&tab);

        let content = tab.get_content()?;
        Ok(content)
    }

    fn backoff(&self) -> Backoff {
        Backoff::from_secs(5.0, 10.0)
    }
}

/// One headless Chrome process per fetch. There is no explicit teardown: the
/// process is killed by the inner `Browser`'s own drop when the session goes
/// out of scope, on success and error paths alike.
struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    fn launch(render_wait: Duration) -> Result<Self> {
        let user_agent = format!("--user-agent={}", USER_AGENT);
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some(WINDOW_SIZE))
            .args(vec![OsStr::new("--disable-gpu"), OsStr::new(&user_agent)])
            // The render wait is silent on the wire; the default idle timeout would cut it off
            .idle_browser_timeout(render_wait + Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow!("Invalid browser launch options: {}", e))?;

        let browser = Browser::new(options)?;
        debug!("Browser session started");
        Ok(BrowserSession { browser })
    }
}
