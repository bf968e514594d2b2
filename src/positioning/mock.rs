//! Mock position source for testing and development

use crate::core::Coordinate;
use crate::positioning::error::{PositionError, PositionResult};
use crate::positioning::source::{FixOptions, PositionEvent, PositionSource, WatchHandle};
use std::collections::VecDeque;

/// Scripted position source.
///
/// Fixes and failures are queued ahead of time and delivered through
/// `poll()` while a one-shot request or a watch is active, in the order
/// they were pushed.
pub struct MockPositionSource {
    supported: bool,
    pending: VecDeque<PositionEvent>,
    active_watch: Option<WatchHandle>,
    oneshot_outstanding: bool,
    watch_counter: u32,
    last_fix_options: Option<FixOptions>,
    last_watch_options: Option<FixOptions>,
    simulate_errors: bool,
    error_probability: f32,
}

impl MockPositionSource {
    /// Create a mock source with positioning available.
    pub fn new() -> Self {
        Self {
            supported: true,
            pending: VecDeque::new(),
            active_watch: None,
            oneshot_outstanding: false,
            watch_counter: 0,
            last_fix_options: None,
            last_watch_options: None,
            simulate_errors: false,
            error_probability: 0.0,
        }
    }

    /// Create a mock source on which positioning is unsupported, so every
    /// request fails immediately.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Queue a successful fix for delivery.
    pub fn push_fix(&mut self, latitude: f64, longitude: f64, timestamp_ms: u64) {
        self.pending
            .push_back(PositionEvent::Fix(Coordinate::new(
                latitude,
                longitude,
                timestamp_ms,
            )));
    }

    /// Queue a failed fix attempt for delivery.
    pub fn push_failure(&mut self, error: PositionError) {
        self.pending.push_back(PositionEvent::Failed(error));
    }

    /// Enable random fix failures with the given probability (0.0 to 1.0).
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Options passed to the most recent one-shot request.
    pub fn last_fix_options(&self) -> Option<&FixOptions> {
        self.last_fix_options.as_ref()
    }

    /// Options passed to the most recent watch registration.
    pub fn last_watch_options(&self) -> Option<&FixOptions> {
        self.last_watch_options.as_ref()
    }

    /// Number of queued, undelivered events.
    pub fn pending_event_count(&self) -> usize {
        self.pending.len()
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }
}

impl Default for MockPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionSource for MockPositionSource {
    fn request_fix(&mut self, options: &FixOptions) -> PositionResult<()> {
        if !self.supported {
            return Err(PositionError::Unsupported);
        }

        self.last_fix_options = Some(*options);
        self.oneshot_outstanding = true;
        Ok(())
    }

    fn watch(&mut self, options: &FixOptions) -> PositionResult<WatchHandle> {
        if !self.supported {
            return Err(PositionError::Unsupported);
        }

        self.watch_counter += 1;
        let handle = WatchHandle::new(self.watch_counter);
        self.active_watch = Some(handle);
        self.last_watch_options = Some(*options);
        Ok(handle)
    }

    fn clear_watch(&mut self, handle: WatchHandle) {
        if self.active_watch == Some(handle) {
            self.active_watch = None;
            // A cleared watch delivers nothing further
            self.pending.clear();
        }
    }

    fn poll(&mut self) -> Option<PositionEvent> {
        if self.active_watch.is_none() && !self.oneshot_outstanding {
            return None;
        }

        if self.should_simulate_error() {
            let timeout_ms = self
                .last_watch_options
                .map_or(5_000, |options| options.timeout_ms);
            return Some(PositionEvent::Failed(PositionError::Timeout {
                timeout_ms,
            }));
        }

        let event = self.pending.pop_front()?;
        if self.active_watch.is_none() {
            // One-shot requests deliver a single outcome
            self.oneshot_outstanding = false;
        }
        Some(event)
    }

    fn is_watching(&self) -> bool {
        self.active_watch.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_creation() {
        let source = MockPositionSource::new();
        assert!(!source.is_watching());
        assert_eq!(source.pending_event_count(), 0);
    }

    #[test]
    fn test_no_delivery_without_request_or_watch() {
        let mut source = MockPositionSource::new();
        source.push_fix(22.30, 114.17, 1000);

        assert!(source.poll().is_none());
        assert_eq!(source.pending_event_count(), 1);
    }

    #[test]
    fn test_watch_delivers_in_arrival_order() {
        let mut source = MockPositionSource::new();
        source.push_fix(22.30, 114.17, 1000);
        source.push_failure(PositionError::Timeout { timeout_ms: 5000 });
        source.push_fix(22.31, 114.17, 2000);

        let handle = source.watch(&FixOptions::watch_updates()).unwrap();
        assert!(source.is_watching());

        assert!(matches!(source.poll(), Some(PositionEvent::Fix(c)) if c.timestamp_ms == 1000));
        assert!(matches!(source.poll(), Some(PositionEvent::Failed(_))));
        assert!(matches!(source.poll(), Some(PositionEvent::Fix(c)) if c.timestamp_ms == 2000));
        assert!(source.poll().is_none());

        source.clear_watch(handle);
        assert!(!source.is_watching());
    }

    #[test]
    fn test_clear_watch_stops_delivery() {
        let mut source = MockPositionSource::new();
        let handle = source.watch(&FixOptions::watch_updates()).unwrap();
        source.push_fix(22.30, 114.17, 1000);

        source.clear_watch(handle);
        assert!(source.poll().is_none());
        assert_eq!(source.pending_event_count(), 0);

        // Clearing again is a no-op
        source.clear_watch(handle);
        assert!(!source.is_watching());
    }

    #[test]
    fn test_oneshot_delivers_single_outcome() {
        let mut source = MockPositionSource::new();
        source.push_fix(22.30, 114.17, 1000);
        source.push_fix(22.31, 114.17, 2000);

        source.request_fix(&FixOptions::initial_fix()).unwrap();
        assert!(matches!(source.poll(), Some(PositionEvent::Fix(_))));
        // The one-shot is satisfied; no watch is active
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_unsupported_source() {
        let mut source = MockPositionSource::unsupported();

        let fix = source.request_fix(&FixOptions::initial_fix());
        assert_eq!(fix, Err(PositionError::Unsupported));

        let watch = source.watch(&FixOptions::watch_updates());
        assert!(matches!(watch, Err(PositionError::Unsupported)));
    }

    #[test]
    fn test_error_simulation() {
        let mut source = MockPositionSource::new();
        source.watch(&FixOptions::watch_updates()).unwrap();
        source.simulate_errors(true, 1.0); // 100% error rate

        assert!(matches!(
            source.poll(),
            Some(PositionEvent::Failed(PositionError::Timeout { .. }))
        ));
    }

    #[test]
    fn test_request_options_recorded() {
        let mut source = MockPositionSource::new();
        source.request_fix(&FixOptions::initial_fix()).unwrap();
        source.watch(&FixOptions::watch_updates()).unwrap();

        let fix_options = source.last_fix_options().unwrap();
        assert!(fix_options.high_accuracy);
        assert_eq!(fix_options.timeout_ms, 10_000);
        assert_eq!(fix_options.max_cache_age_ms, 0);

        let watch_options = source.last_watch_options().unwrap();
        assert_eq!(watch_options.timeout_ms, 5_000);
        assert_eq!(watch_options.max_cache_age_ms, 1_000);
    }
}
