//! Deterministic teardown of map-related resources.
//!
//! A map view accumulates native resources over its lifetime: event
//! listeners, markers, geolocation watches, timers. [`MapResourceManager`]
//! is a registry of zero-argument cleanup callbacks guaranteeing each runs
//! exactly once, in registration order, regardless of which teardown path
//! fires first (unmount, error path, or drop).
//!
//! # Design
//!
//! - **Exactly once**: `cleanup()` is idempotent. The first call consumes
//!   the callbacks; later calls return immediately.
//! - **No partial teardown**: a panicking callback is caught and recorded,
//!   and every remaining callback still runs. Failures are aggregated into
//!   a [`CleanupError`] returned after the full sweep, never thrown
//!   mid-sequence.
//! - **Drop safety**: dropping an uncleaned manager runs the sweep
//!   best-effort, logging failures instead of panicking in `drop`.
//!
//! # Example
//!
//! ```
//! use monitore_geo::resource::MapResourceManager;
//!
//! let mut resources = MapResourceManager::new();
//! resources.register_cleanup("position-watch", || { /* clear watch */ });
//! resources.register_cleanup("markers", || { /* remove markers */ });
//!
//! resources.cleanup().unwrap();
//! assert!(resources.is_cleaned());
//! resources.cleanup().unwrap(); // no-op
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

/// A cleanup callback registered for teardown.
type CleanupCallback = Box<dyn FnOnce() + Send>;

/// One callback that panicked during the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Label the callback was registered under.
    pub label: String,
    /// Position in registration order.
    pub index: usize,
    /// Panic message, when one could be extracted.
    pub message: String,
}

/// One or more cleanup callbacks failed; the sweep itself completed.
#[derive(Debug, Error)]
#[error("{} cleanup callback(s) failed: {}", .failures.len(), summarize(.failures))]
pub struct CleanupError {
    /// Every failure observed during the sweep, in registration order.
    pub failures: Vec<CleanupFailure>,
}

fn summarize(failures: &[CleanupFailure]) -> String {
    failures
        .iter()
        .map(|f| f.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exactly-once release of registered map resources.
pub struct MapResourceManager {
    callbacks: Vec<(String, CleanupCallback)>,
    cleaned: bool,
}

impl Default for MapResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapResourceManager")
            .field("pending", &self.callbacks.len())
            .field("cleaned", &self.cleaned)
            .finish()
    }
}

impl MapResourceManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            cleaned: false,
        }
    }

    /// Append a cleanup callback. Always succeeds.
    ///
    /// The label identifies the resource in failure reports and logs.
    /// Registering after `cleanup()` has run releases the resource
    /// immediately instead of queueing it: the manager stays cleaned, and a
    /// panic in the late callback is caught and logged rather than queued
    /// for a sweep that will never come.
    pub fn register_cleanup(&mut self, label: impl Into<String>, callback: impl FnOnce() + Send + 'static) {
        let label = label.into();
        if self.cleaned {
            debug!(label = %label, "registered after cleanup, releasing immediately");
            if let Err(payload) = catch_unwind(AssertUnwindSafe(callback)) {
                let message = panic_message(payload.as_ref());
                warn!(label = %label, message = %message, "cleanup callback failed");
            }
            return;
        }
        self.callbacks.push((label, Box::new(callback)));
    }

    /// Run every registered callback once, in registration order.
    ///
    /// Idempotent: if the manager is already cleaned this returns `Ok(())`
    /// immediately without re-invoking anything. A panicking callback does
    /// not stop the sweep; all failures are collected and returned together
    /// after every callback has been attempted.
    pub fn cleanup(&mut self) -> Result<(), CleanupError> {
        if self.cleaned {
            return Ok(());
        }
        self.cleaned = true;

        let mut failures = Vec::new();
        for (index, (label, callback)) in self.callbacks.drain(..).enumerate() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(callback)) {
                let message = panic_message(payload.as_ref());
                warn!(label = %label, index, message = %message, "cleanup callback failed");
                failures.push(CleanupFailure {
                    label,
                    index,
                    message,
                });
            }
        }

        if failures.is_empty() {
            debug!("map resources released");
            Ok(())
        } else {
            Err(CleanupError { failures })
        }
    }

    /// True once `cleanup()` has run. Latched: never reverts to `false`.
    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    /// Number of callbacks awaiting the sweep.
    pub fn pending(&self) -> usize {
        self.callbacks.len()
    }
}

impl Drop for MapResourceManager {
    fn drop(&mut self) {
        if !self.cleaned && !self.callbacks.is_empty() {
            debug!(pending = self.callbacks.len(), "releasing map resources on drop");
            // Failures are already logged inside cleanup(); never panic in drop.
            let _ = self.cleanup();
        }
    }
}

/// Best-effort extraction of a panic payload message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
