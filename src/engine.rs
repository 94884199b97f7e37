//! Browser engine handle
//!
//! Ownership wrapper around the single headless Chrome process shared by all
//! requests. The engine is consumed through the [`RenderEngine`] and
//! [`EnginePage`] traits so the render pipeline can be tested against a fake
//! engine; [`ChromiumEngine`] is the chromiumoxide-backed implementation.

use crate::{create_browser_config, Config, GatewayError, PageFormat};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetScriptExecutionDisabledParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, Headers, SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// How long a scripted page is given to settle after the load event
///
/// The engine exposes no direct network-idle signal, so scripted pages get a
/// fixed grace period for post-load fetches to drain.
const NETWORK_SETTLE: Duration = Duration::from_millis(500);

/// Navigation wait strategy
///
/// A scripted page's meaningful content may still be loading after the base
/// document loads; a non-scripted page is complete once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Wait for the load event plus a network-settle grace period
    NetworkIdle,
    /// Wait for the load event only
    Load,
}

/// Handle to the shared browser-automation process
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Open a new isolated page (tab); rejected once the engine is closed
    async fn open_page(&self) -> Result<Box<dyn EnginePage>, GatewayError>;

    /// Shut the engine down; subsequent `open_page` calls fail
    async fn close(&self);
}

/// An isolated browsing context driven by the render pipeline
#[async_trait]
pub trait EnginePage: Send + Sync {
    async fn set_javascript_enabled(&self, enabled: bool) -> Result<(), GatewayError>;

    async fn set_extra_headers(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<(), GatewayError>;

    async fn navigate(&self, url: &str, wait: WaitStrategy) -> Result<(), GatewayError>;

    async fn export_pdf(&self, format: PageFormat) -> Result<Vec<u8>, GatewayError>;

    async fn close(self: Box<Self>);
}

/// The chromiumoxide-backed engine: exactly one per process
pub struct ChromiumEngine {
    browser: Arc<Mutex<Browser>>,
    handler: tokio::task::JoinHandle<Result<(), chromiumoxide::error::CdpError>>,
    closed: AtomicBool,
}

impl ChromiumEngine {
    /// Launch the headless Chrome process
    ///
    /// Must succeed before the HTTP listener starts; a launch failure is
    /// fatal to startup.
    pub async fn launch(config: &Config) -> Result<Self, GatewayError> {
        let browser_config = create_browser_config(config)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| GatewayError::BrowserLaunchFailed(e.to_string()))?;

        // The handler implements Stream and must be polled for the CDP
        // connection to make progress.
        let handler_task = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::error!("CDP handler error: {}", e);
                        return Err(e);
                    }
                    None => {
                        tracing::info!("CDP handler stream ended");
                        break;
                    }
                }
            }
            Ok(())
        });

        info!("Browser engine launched");

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            handler: handler_task,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    async fn open_page(&self) -> Result<Box<dyn EnginePage>, GatewayError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GatewayError::EngineClosed);
        }

        let browser = self.browser.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| GatewayError::PageError(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Shutting down browser engine");
        let _ = self.browser.lock().await.close().await;
        self.handler.abort();
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl EnginePage for ChromiumPage {
    async fn set_javascript_enabled(&self, enabled: bool) -> Result<(), GatewayError> {
        self.page
            .execute(SetScriptExecutionDisabledParams::new(!enabled))
            .await
            .map_err(|e| GatewayError::PageError(e.to_string()))?;
        Ok(())
    }

    async fn set_extra_headers(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<(), GatewayError> {
        // setExtraHTTPHeaders requires the network domain to be enabled.
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| GatewayError::PageError(e.to_string()))?;

        let header_map = serde_json::to_value(headers)?;
        self.page
            .execute(SetExtraHttpHeadersParams::new(Headers::new(header_map)))
            .await
            .map_err(|e| GatewayError::PageError(e.to_string()))?;
        Ok(())
    }

    async fn navigate(&self, url: &str, wait: WaitStrategy) -> Result<(), GatewayError> {
        self.page
            .goto(url.to_string())
            .await
            .map_err(|e| GatewayError::NavigationFailed(e.to_string()))?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| GatewayError::NavigationFailed(e.to_string()))?;

        if wait == WaitStrategy::NetworkIdle {
            tokio::time::sleep(NETWORK_SETTLE).await;
        }

        Ok(())
    }

    async fn export_pdf(&self, format: PageFormat) -> Result<Vec<u8>, GatewayError> {
        let params = PrintToPdfParams {
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            paper_width: Some(format.width_inches()),
            paper_height: Some(format.height_inches()),
            ..Default::default()
        };

        self.page
            .pdf(params)
            .await
            .map_err(|e| GatewayError::ExportFailed(e.to_string()))
    }

    async fn close(self: Box<Self>) {
        let _ = self.page.close().await;
    }
}
