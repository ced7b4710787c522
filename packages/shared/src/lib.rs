//! Shared utilities for Chanoma.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: JST timestamps and the clock abstraction

pub mod logger;
pub mod time;
