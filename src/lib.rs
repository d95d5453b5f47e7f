//! TICKWATCH — stock quote polling monitor.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod quotes;
pub mod tracker;
pub mod journal;
pub mod monitor;
