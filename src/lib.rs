//! # pdf-gateway
//!
//! A stateless HTTP gateway that turns requests for paths ending in `.pdf`
//! into rendered PDF documents by driving a single shared headless Chrome
//! instance, and redirects every other request back to the origin host.
//!
//! Requests for `/some/page.pdf` have the extension stripped (a trailing
//! `/index` segment too, so `/a/index.pdf` and `/a.pdf` resolve identically),
//! are fetched from the configured origin with the caller's headers forwarded,
//! and come back as `application/pdf`. Any other request is answered with a
//! 301 back to the origin, which doubles as a cheap way to keep the browser
//! engine warm.
//!
//! Request traffic doubles as a heartbeat: if no request arrives for the
//! configured idle window the process closes the engine and exits cleanly,
//! and the fronting proxy restarts it on the next request. SIGINT/SIGTERM
//! take the same shutdown path.
//!
//! ## Quick start
//!
//! ```bash
//! HOSTNAME=showcase.example.com PORT=3000 FORMAT=letter pdf-gateway
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PORT` | 3000 | Listen port |
//! | `HOSTNAME` | required | Origin host (or derived from `FLY_APP_NAME`) |
//! | `FORMAT` | letter | PDF paper format |
//! | `JAVASCRIPT` | enabled | Disabled only by the literal `false` |
//! | `TIMEOUT` | 15 | Idle shutdown timeout in minutes |
//! | `CHROME_PATH` | auto | Chrome executable path |

/// Configuration snapshot and Chrome launch settings
pub mod config;

/// Error types
pub mod error;

/// Browser engine handle and the render-engine trait seam
pub mod engine;

/// Idle timer and shutdown control
pub mod lifecycle;

/// Render/redirect counters
pub mod metrics;

/// The configure → navigate → export pipeline
pub mod render;

/// Redirect/render classification and URL rewriting
pub mod router;

/// HTTP surface
pub mod server;

/// Command-line interface
pub mod cli;


pub use cli::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use lifecycle::*;
pub use metrics::*;
pub use render::*;
pub use router::*;
pub use server::*;
