//! Core types and constants for the fare meter

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
