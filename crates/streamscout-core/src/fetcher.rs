//! Page fetch strategies for scraping
//!
//! The target page querier only sees a [`PageFetcher`]. The static strategy
//! is always available; the rendered one exists when the crate is built
//! with the `render` feature and a Chromium binary can be launched.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ScoutClient;
use crate::error::Result;

/// Fetches the HTML of a page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Short label used in logs
    fn kind(&self) -> &'static str;

    /// Fetch one page with a single attempt
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET, no script execution
pub struct StaticFetcher {
    client: ScoutClient,
}

impl StaticFetcher {
    pub fn new(client: ScoutClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    fn kind(&self) -> &'static str {
        "static"
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.client.fetch_once(url).await
    }
}

/// Returns the rendering strategy if this build supports one
pub fn rendered_fetcher() -> Option<Arc<dyn PageFetcher>> {
    #[cfg(feature = "render")]
    {
        Some(Arc::new(render::RenderedFetcher::default()))
    }

    #[cfg(not(feature = "render"))]
    {
        None
    }
}

#[cfg(feature = "render")]
pub mod render {
    //! Headless Chromium rendering, for URLs injected by scripts
    //!
    //! One browser process is launched on the first page and shared by every
    //! later page; each page gets its own tab.

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use headless_chrome::{Browser, LaunchOptions};
    use tracing::debug;

    use super::PageFetcher;
    use crate::error::{Result, ScoutError};

    /// Loads the page in headless Chromium and returns the rendered DOM
    pub struct RenderedFetcher {
        /// Time given to page scripts after navigation completes
        pub settle: Duration,
        browser: Arc<Mutex<Option<Browser>>>,
    }

    impl Default for RenderedFetcher {
        fn default() -> Self {
            Self {
                settle: Duration::from_secs(2),
                browser: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for RenderedFetcher {
        fn kind(&self) -> &'static str {
            "rendered"
        }

        async fn fetch_page(&self, url: &str) -> Result<String> {
            let url = url.to_string();
            let settle = self.settle;
            let browser = Arc::clone(&self.browser);

            // headless_chrome is blocking
            tokio::task::spawn_blocking(move || {
                let mut slot = browser
                    .lock()
                    .map_err(|_| ScoutError::RenderError("browser lock poisoned".to_string()))?;
                render_page(&mut slot, &url, settle)
            })
            .await
            .map_err(|e| ScoutError::RenderError(format!("render task failed: {}", e)))?
        }
    }

    /// Return the value in `slot`, filling it with `launch` first if empty
    ///
    /// A failed launch leaves the slot empty so the next call tries again.
    pub(crate) fn get_or_launch<B>(
        slot: &mut Option<B>,
        launch: impl FnOnce() -> Result<B>,
    ) -> Result<&B> {
        let value = match slot.take() {
            Some(value) => value,
            None => launch()?,
        };
        Ok(&*slot.insert(value))
    }

    fn launch_browser() -> Result<Browser> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| ScoutError::RenderUnavailable(e.to_string()))?;
        debug!("launching headless browser");
        Browser::new(options).map_err(|e| ScoutError::RenderUnavailable(e.to_string()))
    }

    fn render_page(slot: &mut Option<Browser>, url: &str, settle: Duration) -> Result<String> {
        let browser = get_or_launch(slot, launch_browser)?;
        let tab = match browser.new_tab() {
            Ok(tab) => tab,
            Err(e) => {
                // browser process is gone, relaunch on the next page
                *slot = None;
                return Err(ScoutError::RenderError(e.to_string()));
            }
        };

        let content = tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .and_then(|tab| {
                std::thread::sleep(settle);
                tab.get_content()
            })
            .map_err(|e| ScoutError::RenderError(e.to_string()));

        if let Err(e) = tab.close(true) {
            debug!(url, error = %e, "failed to close tab");
        }
        content
    }

}
