//! HTTP surface of the gateway
//!
//! A single fallback handler dispatches every request: the idle timer is
//! reset on entry and again after the handler completes, the router decides
//! redirect vs. render, and render failures become 500 responses with the
//! failure detail in the body (operator-facing diagnostic transparency).

use crate::{
    route, Config, IdleTimer, Metrics, RenderRequest, RenderService, RouteDecision,
    ShutdownController,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Shared server context, owned by the lifecycle controller in `main` and
/// passed into the router and render pipeline rather than accessed globally
pub struct GatewayState {
    pub config: Config,
    pub renderer: RenderService,
    pub idle: Arc<IdleTimer>,
    pub shutdown: Arc<ShutdownController>,
    pub metrics: Arc<Metrics>,
}

/// The gateway's HTTP server
#[derive(Clone)]
pub struct GatewayServer {
    state: Arc<GatewayState>,
}

impl GatewayServer {
    pub fn new(
        config: Config,
        renderer: RenderService,
        idle: Arc<IdleTimer>,
        shutdown: Arc<ShutdownController>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state: Arc::new(GatewayState {
                config,
                renderer,
                idle,
                shutdown,
                metrics,
            }),
        }
    }

    /// Create the router; every path goes through the same dispatch handler
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the listener and serve until shutdown is requested
    ///
    /// Uses graceful shutdown: once the idle timer or a signal requests
    /// shutdown, the listener stops accepting connections and in-flight
    /// renders run to completion before this returns.
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("PDF gateway listening on http://{}", addr);

        let shutdown = self.state.shutdown.clone();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.signalled().await })
            .await?;

        Ok(())
    }
}

async fn dispatch(
    State(state): State<Arc<GatewayState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.idle.reset();
    let response = handle_request(&state, &uri, &headers).await;
    state.idle.reset();
    response
}

async fn handle_request(state: &GatewayState, uri: &Uri, headers: &HeaderMap) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let decision = match route(path_and_query, &state.config.target_host) {
        Ok(decision) => decision,
        Err(e) => {
            error!("Failed to rewrite {}: {}", path_and_query, e);
            return failure_response(&e.to_string());
        }
    };

    match decision {
        RouteDecision::Redirect { location } => {
            state.metrics.record_redirect();
            (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location.clone())],
                format!("Non PDF request - redirecting to {location}"),
            )
                .into_response()
        }
        RouteDecision::Render { url } => {
            let request_id = Uuid::new_v4();
            info!(%request_id, %url, "Printing page");

            let request = RenderRequest {
                url,
                headers: forwarded_headers(headers),
                javascript_enabled: state.config.javascript_enabled,
                page_format: state.config.page_format,
            };

            let started = Instant::now();
            match state.renderer.render(request).await {
                Ok(bytes) => {
                    state.metrics.record_render(started.elapsed(), true);
                    ([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response()
                }
                Err(e) => {
                    state.metrics.record_render(started.elapsed(), false);
                    error!(%request_id, error = %e, "Render failed");
                    failure_response(&e.to_string())
                }
            }
        }
    }
}

fn failure_response(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html")],
        format!("<pre>{detail}</pre>"),
    )
        .into_response()
}

/// Inbound headers to forward to the origin during navigation
///
/// All headers pass through except `Host`, which would confuse the origin's
/// own routing. Repeated header lines are combined into one comma-separated
/// value, since the engine takes a single value per header name. Values that
/// are not valid UTF-8 are dropped.
pub fn forwarded_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut forwarded: HashMap<String, String> = HashMap::new();
    for (name, value) in headers.iter() {
        if *name == header::HOST {
            continue;
        }
        let value = match value.to_str() {
            Ok(v) => v,
            Err(_) => continue,
        };
        forwarded
            .entry(name.as_str().to_string())
            .and_modify(|combined| {
                combined.push_str(", ");
                combined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    forwarded
}
