//! Quote sources.
//!
//! Defines the `QuoteSource` trait and the AllTick implementation. The
//! trait is the seam between the driver loop and the wire: tests drive
//! the loop with scripted sources instead of a live endpoint.

pub mod alltick;

use async_trait::async_trait;

use crate::types::{MonitorError, Quote};

/// Abstraction over a latest-price quote feed.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest tick for every watched symbol.
    ///
    /// Transport failures and non-2xx statuses surface as
    /// `MonitorError::Network`; an unexpected response body as
    /// `MonitorError::Parse`. Both are recoverable per cycle.
    async fn fetch_ticks(&self) -> Result<Vec<Quote>, MonitorError>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
