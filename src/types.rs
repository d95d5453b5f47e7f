//! Shared types for the TICKWATCH monitor.
//!
//! The data model is deliberately small: one tick, the up/down/flat
//! indicator shown next to each price, the alert derived from a
//! baseline deviation, and the driver's run state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// One price observation for one symbol, as returned by the quote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker code, e.g. "3690.HK".
    pub code: String,
    /// Latest traded price. The API sends a decimal string; `Decimal`
    /// preserves it exactly.
    pub price: Decimal,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.price)
    }
}

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// Per-cycle movement relative to the previous observed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Up,
    Down,
    Flat,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Console glyphs: 涨 = up, 跌 = down, 平 = flat.
        let glyph = match self {
            Indicator::Up => "(涨)",
            Indicator::Down => "(跌)",
            Indicator::Flat => "(平)",
        };
        write!(f, "{glyph}")
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// Direction of a baseline deviation, for alert wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "上涨"),
            Direction::Down => write!(f, "下跌"),
        }
    }
}

/// A baseline-deviation alert. Transient: printed and journalled, never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub code: String,
    pub direction: Direction,
    /// Signed percentage change from baseline.
    pub pct: Decimal,
    pub baseline: Decimal,
    pub price: Decimal,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "⚠️ 预警: {} {} {:.2}% (基准: {}, 当前: {})",
            self.code,
            self.direction,
            self.pct.abs(),
            self.baseline,
            self.price,
        )
    }
}

// ---------------------------------------------------------------------------
// Monitor state
// ---------------------------------------------------------------------------

/// Driver run state. RUNNING until the interrupt signal arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Running,
    Stopped,
}

/// Mutable state owned by the driver loop.
#[derive(Debug)]
pub struct MonitorState {
    pub status: MonitorStatus,
    pub cycle_count: u64,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            status: MonitorStatus::Running,
            cycle_count: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == MonitorStatus::Running
    }

    pub fn stop(&mut self) {
        self.status = MonitorStatus::Stopped;
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for TICKWATCH.
///
/// `Network` and `Parse` are recoverable per cycle: the driver journals
/// them and continues after the normal sleep.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("unexpected response shape: {0}")]
    Parse(String),

    #[error("journal write failed: {0}")]
    Journal(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indicator_display() {
        assert_eq!(format!("{}", Indicator::Up), "(涨)");
        assert_eq!(format!("{}", Indicator::Down), "(跌)");
        assert_eq!(format!("{}", Indicator::Flat), "(平)");
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(format!("{}", Direction::Up), "上涨");
        assert_eq!(format!("{}", Direction::Down), "下跌");
    }

    #[test]
    fn test_alert_display_two_decimals() {
        let alert = Alert {
            code: "3690.HK".to_string(),
            direction: Direction::Up,
            pct: dec!(1.6),
            baseline: dec!(100),
            price: dec!(101.6),
        };
        assert_eq!(
            alert.to_string(),
            "⚠️ 预警: 3690.HK 上涨 1.60% (基准: 100, 当前: 101.6)"
        );
    }

    #[test]
    fn test_alert_display_uses_absolute_magnitude() {
        let alert = Alert {
            code: "9618.HK".to_string(),
            direction: Direction::Down,
            pct: dec!(-2.35),
            baseline: dec!(200),
            price: dec!(195.3),
        };
        let text = alert.to_string();
        assert!(text.contains("下跌 2.35%"), "got: {text}");
        assert!(!text.contains('-'), "magnitude must be unsigned: {text}");
    }

    #[test]
    fn test_quote_deserializes_price_string() {
        let q: Quote = serde_json::from_str(r#"{"code":"2015.HK","price":"68.35"}"#).unwrap();
        assert_eq!(q.code, "2015.HK");
        assert_eq!(q.price, dec!(68.35));
    }

    #[test]
    fn test_monitor_state_transitions() {
        let mut state = MonitorState::new();
        assert!(state.is_running());
        state.stop();
        assert_eq!(state.status, MonitorStatus::Stopped);
        assert!(!state.is_running());
    }
}
