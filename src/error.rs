use thiserror::Error;

/// Errors produced by the gateway
///
/// Startup errors (configuration, browser launch) are fatal and abort the
/// process before the listener starts; everything else is recovered per
/// request and surfaced to the caller as a 500 response.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Browser launch failed: {0}")]
    BrowserLaunchFailed(String),

    #[error("Browser engine is shut down")]
    EngineClosed,

    #[error("Page error: {0}")]
    PageError(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("PDF export failed: {0}")]
    ExportFailed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::SerializationError(err.to_string())
    }
}
