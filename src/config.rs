//! Configuration management for the PDF gateway
//!
//! Configuration is read once at startup from environment variables (the way
//! the gateway is deployed) or from a JSON file, optionally overridden by CLI
//! flags, and never mutated afterwards.

use crate::GatewayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Immutable snapshot of the gateway's operating parameters
///
/// # Examples
///
/// ```rust
/// use pdf_gateway::{Config, PageFormat};
///
/// let config = Config {
///     target_host: "showcase.example.com".to_string(),
///     page_format: PageFormat::A4,
///     ..Default::default()
/// };
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Port the HTTP listener binds to (default: 3000)
    pub port: u16,

    /// Hostname of the origin application that pages are fetched from
    ///
    /// Required. Every inbound URL is rewritten to `https://{target_host}...`
    /// before redirecting or rendering.
    pub target_host: String,

    /// Paper format used for PDF export (default: letter)
    pub page_format: PageFormat,

    /// Whether script execution is enabled during rendering (default: true)
    ///
    /// Also selects the navigation wait strategy: scripted pages wait for the
    /// network to settle, non-scripted pages are complete once loaded.
    pub javascript_enabled: bool,

    /// Duration of inactivity after which the process shuts itself down
    /// (default: 15 minutes)
    pub idle_timeout: Duration,

    /// Path to the Chrome/Chromium executable (default: auto-detect)
    pub chrome_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            target_host: String::new(),
            page_format: PageFormat::Letter,
            javascript_enabled: true,
            idle_timeout: Duration::from_secs(15 * 60),
            chrome_path: None,
        }
    }
}

impl Config {
    /// Load configuration from process environment variables
    ///
    /// Recognized variables: `PORT`, `FORMAT`, `JAVASCRIPT`, `TIMEOUT`
    /// (minutes), `HOSTNAME`, `CHROME_PATH`. `HOSTNAME` is required but may
    /// be derived from `FLY_APP_NAME` when that ends in `-pdf` (the app name
    /// minus the suffix, plus `.fly.dev`). Unparsable values are
    /// configuration errors rather than silent fallbacks.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_env_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| {
                GatewayError::ConfigurationError(format!("PORT is not a valid port: {value:?}"))
            })?,
            None => 3000,
        };

        let page_format = match lookup("FORMAT") {
            Some(value) => value.parse::<PageFormat>()?,
            None => PageFormat::Letter,
        };

        // Disabled only by the literal "false"; any other value (or unset)
        // leaves script execution enabled.
        let javascript_enabled = lookup("JAVASCRIPT").as_deref() != Some("false");

        let timeout_minutes = match lookup("TIMEOUT") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                GatewayError::ConfigurationError(format!(
                    "TIMEOUT is not a whole number of minutes: {value:?}"
                ))
            })?,
            None => 15,
        };

        let target_host = match lookup("HOSTNAME") {
            Some(host) if !host.is_empty() => host,
            _ => match lookup("FLY_APP_NAME") {
                Some(app) if app.ends_with("-pdf") => {
                    format!("{}.fly.dev", &app[..app.len() - 4])
                }
                _ => {
                    return Err(GatewayError::ConfigurationError(
                        "HOSTNAME is required".to_string(),
                    ))
                }
            },
        };

        Ok(Self {
            port,
            target_host,
            page_format,
            javascript_enabled,
            idle_timeout: Duration::from_secs(timeout_minutes * 60),
            chrome_path: lookup("CHROME_PATH"),
        })
    }
}

/// Paper formats supported for PDF export
///
/// Dimensions match the headless engine's paper format table; CSS page-size
/// hints in the rendered page take precedence over the configured format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Letter,
    Legal,
    Tabloid,
    Ledger,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PageFormat {
    /// Paper width in inches
    pub fn width_inches(&self) -> f64 {
        match self {
            PageFormat::Letter => 8.5,
            PageFormat::Legal => 8.5,
            PageFormat::Tabloid => 11.0,
            PageFormat::Ledger => 17.0,
            PageFormat::A0 => 33.1,
            PageFormat::A1 => 23.4,
            PageFormat::A2 => 16.54,
            PageFormat::A3 => 11.7,
            PageFormat::A4 => 8.27,
            PageFormat::A5 => 5.83,
            PageFormat::A6 => 4.13,
        }
    }

    /// Paper height in inches
    pub fn height_inches(&self) -> f64 {
        match self {
            PageFormat::Letter => 11.0,
            PageFormat::Legal => 14.0,
            PageFormat::Tabloid => 17.0,
            PageFormat::Ledger => 11.0,
            PageFormat::A0 => 46.8,
            PageFormat::A1 => 33.1,
            PageFormat::A2 => 23.4,
            PageFormat::A3 => 16.54,
            PageFormat::A4 => 11.7,
            PageFormat::A5 => 8.27,
            PageFormat::A6 => 5.83,
        }
    }
}

impl FromStr for PageFormat {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            "tabloid" => Ok(PageFormat::Tabloid),
            "ledger" => Ok(PageFormat::Ledger),
            "a0" => Ok(PageFormat::A0),
            "a1" => Ok(PageFormat::A1),
            "a2" => Ok(PageFormat::A2),
            "a3" => Ok(PageFormat::A3),
            "a4" => Ok(PageFormat::A4),
            "a5" => Ok(PageFormat::A5),
            "a6" => Ok(PageFormat::A6),
            other => Err(GatewayError::ConfigurationError(format!(
                "unknown page format: {other:?}"
            ))),
        }
    }
}

/// Generate Chrome command-line arguments based on configuration
///
/// One shared instance serves all requests, so the user data directory only
/// needs to be unique per process.
pub fn get_chrome_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-background-timer-throttling".to_string(),
        "--disable-backgrounding-occluded-windows".to_string(),
        "--disable-renderer-backgrounding".to_string(),
        "--disable-extensions".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--no-first-run".to_string(),
        format!("--user-data-dir=/tmp/pdf-gateway-{}", std::process::id()),
    ];

    if !config.javascript_enabled {
        args.push("--disable-javascript".to_string());
    }

    args
}

pub fn create_browser_config(
    config: &Config,
) -> Result<chromiumoxide::browser::BrowserConfig, GatewayError> {
    use chromiumoxide::browser::BrowserConfig;

    let mut builder = BrowserConfig::builder().args(get_chrome_args(config));

    if let Some(chrome_path) = &config.chrome_path {
        builder = builder.chrome_executable(chrome_path);
    }

    builder.build().map_err(GatewayError::ConfigurationError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_format_parse() {
        assert_eq!("letter".parse::<PageFormat>().unwrap(), PageFormat::Letter);
        assert_eq!("a4".parse::<PageFormat>().unwrap(), PageFormat::A4);
        assert!("A4".parse::<PageFormat>().is_err());
        assert!("folio".parse::<PageFormat>().is_err());
    }

    #[test]
    fn test_page_format_dimensions() {
        assert_eq!(PageFormat::Letter.width_inches(), 8.5);
        assert_eq!(PageFormat::Letter.height_inches(), 11.0);
        assert_eq!(PageFormat::A4.width_inches(), 8.27);
        assert_eq!(PageFormat::Ledger.height_inches(), 11.0);
    }

    #[test]
    fn test_chrome_args_disable_javascript() {
        let config = Config {
            javascript_enabled: false,
            ..Default::default()
        };
        let args = get_chrome_args(&config);
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--disable-javascript".to_string()));

        let config = Config::default();
        assert!(!get_chrome_args(&config).contains(&"--disable-javascript".to_string()));
    }
}
