//! Positioning capability boundary
//!
//! This module wraps the external location-sensing capability behind a
//! trait so the session core can be driven by real device positioning or
//! by a scripted mock. Fix outcomes are delivered as discrete events in
//! arrival order, all on the single control thread.

pub mod source;
pub mod mock;
pub mod error;

pub use source::{FixOptions, PositionEvent, PositionSource, WatchHandle};
pub use mock::MockPositionSource;
pub use error::{PositionError, PositionResult};
