//! Render pipeline: configure → navigate → export
//!
//! Drives one isolated page per request against the shared engine and
//! guarantees the page is closed no matter which step fails.

use crate::{EnginePage, GatewayError, PageFormat, RenderEngine, WaitStrategy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Everything a single render needs, derived from the inbound request
///
/// Created at request entry, discarded after the response is produced.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Rewritten absolute URL on the origin host
    pub url: String,
    /// Inbound request headers minus `Host`, forwarded onto navigation
    pub headers: HashMap<String, String>,
    pub javascript_enabled: bool,
    pub page_format: PageFormat,
}

/// Renders pages through the shared engine handle
#[derive(Clone)]
pub struct RenderService {
    engine: Arc<dyn RenderEngine>,
}

impl RenderService {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Produce PDF bytes for the request, or the failure that stopped it
    ///
    /// The page acquired for the attempt is always closed, on success and on
    /// every failure path.
    pub async fn render(&self, request: RenderRequest) -> Result<Vec<u8>, GatewayError> {
        let page = self.engine.open_page().await?;
        let result = Self::drive_page(page.as_ref(), &request).await;
        page.close().await;
        result
    }

    async fn drive_page(
        page: &dyn EnginePage,
        request: &RenderRequest,
    ) -> Result<Vec<u8>, GatewayError> {
        page.set_javascript_enabled(request.javascript_enabled)
            .await?;
        page.set_extra_headers(&request.headers).await?;

        let wait = if request.javascript_enabled {
            WaitStrategy::NetworkIdle
        } else {
            WaitStrategy::Load
        };

        debug!("Navigating to {} ({:?})", request.url, wait);
        page.navigate(&request.url, wait).await?;

        page.export_pdf(request.page_format).await
    }
}
