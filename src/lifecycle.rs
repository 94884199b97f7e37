//! Idle timer and shutdown control
//!
//! The gateway is deployed as an ephemeral pay-per-use instance behind a
//! proxy that restarts it on demand; absence of traffic for the configured
//! window is the sole trigger for graceful self-termination. An interrupt
//! signal converges on the same shutdown routine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

/// What triggered the shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    IdleTimeout,
    Signal,
}

/// Single shutdown routine shared by idle expiry and process signals
///
/// `request` is idempotent: the first call wins, later calls are no-ops.
/// The listener observes the shutdown through [`signalled`], stops accepting
/// connections, and lets in-flight requests finish before the engine closes.
///
/// [`signalled`]: ShutdownController::signalled
pub struct ShutdownController {
    requested: AtomicBool,
    tx: watch::Sender<bool>,
}

impl ShutdownController {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(false);
        Arc::new(Self {
            requested: AtomicBool::new(false),
            tx,
        })
    }

    pub fn request(&self, reason: ShutdownReason) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Shutdown requested: {:?}", reason);
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been requested
    pub async fn signalled(&self) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow() {
            return;
        }
        let _ = rx.changed().await;
    }
}

/// Countdown reset on every inbound request
///
/// At most one pending wake-up exists at a time: `reset` replaces the stored
/// deadline, and the watcher task re-reads it on every wake, so a reset
/// always invalidates the previously scheduled expiry.
pub struct IdleTimer {
    deadline: Mutex<Instant>,
    timeout: Duration,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            deadline: Mutex::new(Instant::now() + timeout),
            timeout,
        })
    }

    /// Cancel any pending expiry and schedule a new one `timeout` from now
    pub fn reset(&self) {
        *self.deadline.lock().unwrap() = Instant::now() + self.timeout;
    }

    fn deadline(&self) -> Instant {
        *self.deadline.lock().unwrap()
    }

    /// Spawn the watcher that requests shutdown when the timer expires
    pub fn watch(self: Arc<Self>, shutdown: Arc<ShutdownController>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let deadline = self.deadline();
                tokio::time::sleep_until(deadline).await;

                // A request may have pushed the deadline out while we slept.
                if self.deadline() <= Instant::now() {
                    info!("No traffic for {:?}, shutting down", self.timeout);
                    shutdown.request(ShutdownReason::IdleTimeout);
                    return;
                }
            }
        })
    }
}
