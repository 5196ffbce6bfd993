//! Application-level configuration.
//!
//! - [`DeliberationParams`] : run loop control (round ceiling, seed, concurrency)

pub mod params;

pub use params::{DeliberationParams, MIN_MAX_ROUNDS};
