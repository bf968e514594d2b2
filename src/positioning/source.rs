//! Position source trait and request types

use crate::core::Coordinate;
use crate::positioning::error::{PositionError, PositionResult};
use serde::{Deserialize, Serialize};

/// Options controlling a fix request, mirroring the device positioning API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixOptions {
    /// Request the most accurate fix the hardware can provide
    pub high_accuracy: bool,
    /// Maximum time to wait for a fix before failing (milliseconds)
    pub timeout_ms: u32,
    /// Maximum acceptable age of a cached fix (milliseconds)
    pub max_cache_age_ms: u32,
}

impl FixOptions {
    /// Options for the initial one-shot fix at the start of a hire:
    /// high accuracy, bounded 10 s wait, no cached positions accepted.
    pub fn initial_fix() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_cache_age_ms: 0,
        }
    }

    /// Options for continuous watch updates: fixes up to 1 s stale are
    /// accepted and each update may wait up to 5 s.
    pub fn watch_updates() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5_000,
            max_cache_age_ms: 1_000,
        }
    }
}

/// Handle identifying an active continuous observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(u32);

impl WatchHandle {
    pub(crate) fn new(id: u32) -> Self {
        WatchHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// A delivered positioning outcome
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// A successful fix
    Fix(Coordinate),
    /// A failed fix attempt
    Failed(PositionError),
}

/// Abstraction over the external positioning capability.
///
/// Requests are fire-and-forget; outcomes surface as `PositionEvent`s
/// through `poll()`, in arrival order. A denied or unsupported capability
/// is reported as a recoverable error, never a panic.
pub trait PositionSource {
    /// Request a single current-position fix. The outcome is delivered
    /// through `poll()`.
    fn request_fix(&mut self, options: &FixOptions) -> PositionResult<()>;

    /// Begin continuous position observation.
    fn watch(&mut self, options: &FixOptions) -> PositionResult<WatchHandle>;

    /// Cancel a continuous observation. Idempotent; unknown handles are
    /// ignored. No further events are delivered once the watch is cleared.
    fn clear_watch(&mut self, handle: WatchHandle);

    /// Next pending event, if any.
    fn poll(&mut self) -> Option<PositionEvent>;

    /// Whether a continuous observation is currently active.
    fn is_watching(&self) -> bool;
}
