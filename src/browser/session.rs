use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{Result, ScrapeError};

/// Interval between element-presence polls inside [`Session::wait_for_element`].
const ELEMENT_POLL: Duration = Duration::from_millis(250);

/// One exclusive browsing session.
///
/// All blocking points of the pipeline live behind this trait, which also
/// lets the pagination loop and the orchestrator run against scripted
/// sessions in tests. Element absence on `click` is a normal `Ok(false)`
/// outcome, not an error.
#[async_trait]
pub trait Session: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Current document markup.
    async fn content(&self) -> Result<String>;

    /// Issue one "reveal more content" signal (scroll to the bottom).
    async fn trigger_reveal(&mut self) -> Result<()>;

    /// Wait (bounded) until `selector` matches, then return the current
    /// document. `ScrapeError::ElementWait` when the bound expires.
    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<String>;

    /// Click the first element matching `selector`. `Ok(false)` when no
    /// such element exists.
    async fn click(&mut self, selector: &str) -> Result<bool>;

    async fn close(self: Box<Self>);
}

/// Produces fresh sessions for workers. Sessions are never handed between
/// workers; a worker that loses its session asks the factory for a new one.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Session + 'static;

    async fn create(&self) -> Result<Self::Session>;
}

/// Chromium-backed session.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
}

impl BrowserSession {
    /// Launch a headless browser with a blank page.
    pub async fn launch() -> Result<Self> {
        debug!("launching headless browser");

        let config = BrowserConfig::builder()
            .new_headless_mode()
            .args(vec![
                "--disable-gpu",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--remote-debugging-port=0",
            ])
            .build()
            .map_err(|e| {
                error!("browser configuration failed: {}", e);
                ScrapeError::Session(format!("browser configuration failed: {}", e))
            })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("browser launch failed: {}", e);
            ScrapeError::Session(format!("browser launch failed: {}", e))
        })?;

        // Drive browser events in the background until the browser goes away.
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // Short pause to let the browser state sync before the first command.
        sleep(Duration::from_millis(300)).await;

        let page = browser.new_page("about:blank").await.map_err(|e| {
            error!("page creation failed: {}", e);
            ScrapeError::Session(format!("page creation failed: {}", e))
        })?;

        debug!("headless browser ready");
        Ok(Self { browser, page })
    }
}

#[async_trait]
impl Session for BrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Session(format!("navigation to {} failed: {}", url, e)))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| ScrapeError::Session(format!("navigation to {} failed: {}", url, e)))?;
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| ScrapeError::Session(format!("reading page content failed: {}", e)))
    }

    async fn trigger_reveal(&mut self) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| ScrapeError::Session(format!("scroll signal failed: {}", e)))?;
        Ok(())
    }

    async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return self.content().await;
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::ElementWait {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            sleep(ELEMENT_POLL).await;
        }
    }

    async fn click(&mut self, selector: &str) -> Result<bool> {
        match self.page.find_element(selector).await {
            Ok(element) => {
                element
                    .click()
                    .await
                    .map_err(|e| ScrapeError::Session(format!("click on `{}` failed: {}", selector, e)))?;
                Ok(true)
            }
            // Not found is an expected outcome (e.g. the consent prompt
            // already dismissed), never an error.
            Err(_) => Ok(false),
        }
    }

    async fn close(mut self: Box<Self>) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
    }
}

/// Factory launching one headless browser per session.
#[derive(Debug, Default, Clone)]
pub struct HeadlessFactory;

#[async_trait]
impl SessionFactory for HeadlessFactory {
    type Session = BrowserSession;

    async fn create(&self) -> Result<BrowserSession> {
        info!("starting fresh browser session");
        BrowserSession::launch().await
    }
}
