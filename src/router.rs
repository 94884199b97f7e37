//! Request routing and URL rewriting
//!
//! Every inbound URL is rewritten onto the origin host over https. Paths that
//! do not end in `.pdf` are redirected back to the origin; this path exists
//! specifically to pre-warm the browser engine with a harmless request.
//! Paths that do end in `.pdf` have the extension (and a trailing `/index`
//! segment) stripped and are handed to the render pipeline.

use crate::GatewayError;
use url::Url;

/// Per-request routing decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// 301 back to the origin host
    Redirect { location: String },
    /// Render the rewritten URL as a PDF
    Render { url: String },
}

/// Classify a request by its path and produce the rewritten origin URL
///
/// `path_and_query` is the origin-form request target (`/path?query`). The
/// suffix check is a literal, case-sensitive match, and only one level of
/// `/index` is stripped, so `/a/index.pdf` and `/a.pdf` both resolve to `/a`.
pub fn route(path_and_query: &str, target_host: &str) -> Result<RouteDecision, GatewayError> {
    let mut url = Url::parse(&format!("https://{target_host}{path_and_query}"))
        .map_err(|e| GatewayError::InvalidUrl(format!("{path_and_query}: {e}")))?;

    if !url.path().ends_with(".pdf") {
        return Ok(RouteDecision::Redirect {
            location: url.to_string(),
        });
    }

    let mut path = url.path()[..url.path().len() - 4].to_string();
    if let Some(stripped) = path.strip_suffix("/index") {
        path = stripped.to_string();
    }
    url.set_path(&path);

    Ok(RouteDecision::Render {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(path: &str) -> RouteDecision {
        route(path, "app.example.com").unwrap()
    }

    #[test]
    fn test_non_pdf_redirects() {
        assert_eq!(
            decide("/about"),
            RouteDecision::Redirect {
                location: "https://app.example.com/about".to_string()
            }
        );
        assert_eq!(
            decide("/"),
            RouteDecision::Redirect {
                location: "https://app.example.com/".to_string()
            }
        );
    }

    #[test]
    fn test_redirect_preserves_query() {
        assert_eq!(
            decide("/search?q=term&page=2"),
            RouteDecision::Redirect {
                location: "https://app.example.com/search?q=term&page=2".to_string()
            }
        );
    }

    #[test]
    fn test_pdf_extension_stripped() {
        assert_eq!(
            decide("/foo.pdf"),
            RouteDecision::Render {
                url: "https://app.example.com/foo".to_string()
            }
        );
    }

    #[test]
    fn test_index_segment_stripped() {
        assert_eq!(
            decide("/foo/index.pdf"),
            RouteDecision::Render {
                url: "https://app.example.com/foo".to_string()
            }
        );
        assert_eq!(
            decide("/index.pdf"),
            RouteDecision::Render {
                url: "https://app.example.com/".to_string()
            }
        );
    }

    #[test]
    fn test_index_stripping_is_single_level() {
        assert_eq!(
            decide("/a/index/index.pdf"),
            RouteDecision::Render {
                url: "https://app.example.com/a/index".to_string()
            }
        );
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        assert!(matches!(
            decide("/foo.PDF"),
            RouteDecision::Redirect { .. }
        ));
    }

    #[test]
    fn test_render_preserves_query() {
        assert_eq!(
            decide("/report.pdf?year=2026"),
            RouteDecision::Render {
                url: "https://app.example.com/report?year=2026".to_string()
            }
        );
    }
}
