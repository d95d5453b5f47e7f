//! Baseline and previous-price tracking.
//!
//! Owns the two per-symbol maps the monitor mutates: the baseline
//! (first observed price, never overwritten — the reference point for
//! percentage alerts) and the previous price (most recent observation,
//! used only for the up/down/flat console indicator).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::debug;

use crate::types::{Alert, Direction, Indicator, Quote};

/// Result of one `check_alerts` pass.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Symbols whose baseline was set this cycle, with the recorded price.
    pub baselines_set: Vec<(String, Decimal)>,
    /// Alerts fired this cycle, in quote order.
    pub alerts: Vec<Alert>,
}

/// Tracks baselines and previous prices for the watched symbols.
pub struct ChangeTracker {
    baseline: HashMap<String, Decimal>,
    previous: HashMap<String, Decimal>,
    /// Minimum absolute percentage deviation from baseline that fires.
    threshold: Decimal,
}

impl ChangeTracker {
    pub fn new(threshold: Decimal) -> Self {
        Self {
            baseline: HashMap::new(),
            previous: HashMap::new(),
            threshold,
        }
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    pub fn baseline_for(&self, code: &str) -> Option<Decimal> {
        self.baseline.get(code).copied()
    }

    pub fn previous_for(&self, code: &str) -> Option<Decimal> {
        self.previous.get(code).copied()
    }

    /// Movement indicator against the previous observed price.
    ///
    /// First observation records the price and reads flat. Afterwards the
    /// stored previous price is replaced only when the new price differs;
    /// an equal price leaves the map untouched.
    pub fn indicator(&mut self, code: &str, price: Decimal) -> Indicator {
        let Some(prev) = self.previous.get(code).copied() else {
            self.previous.insert(code.to_string(), price);
            return Indicator::Flat;
        };

        if price > prev {
            self.previous.insert(code.to_string(), price);
            Indicator::Up
        } else if price < prev {
            self.previous.insert(code.to_string(), price);
            Indicator::Down
        } else {
            Indicator::Flat
        }
    }

    /// Check a cycle's quotes against their baselines.
    ///
    /// A symbol seen for the first time gets its baseline recorded and is
    /// skipped for alerting this cycle. Otherwise an alert fires when the
    /// absolute percentage change from baseline reaches the threshold.
    pub fn check_alerts(&mut self, quotes: &[Quote]) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();

        for quote in quotes {
            let Some(baseline) = self.baseline.get(&quote.code).copied() else {
                self.baseline.insert(quote.code.clone(), quote.price);
                outcome.baselines_set.push((quote.code.clone(), quote.price));
                continue;
            };

            let pct = (quote.price - baseline) / baseline * dec!(100);
            debug!(code = %quote.code, %pct, %baseline, "Baseline deviation");

            if pct.abs() >= self.threshold {
                let direction = if pct > Decimal::ZERO {
                    Direction::Up
                } else {
                    Direction::Down
                };
                outcome.alerts.push(Alert {
                    code: quote.code.clone(),
                    direction,
                    pct,
                    baseline,
                    price: quote.price,
                });
            }
        }

        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(code: &str, price: Decimal) -> Quote {
        Quote {
            code: code.to_string(),
            price,
        }
    }

    #[test]
    fn test_first_observation_sets_baseline_without_alert() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        let outcome = tracker.check_alerts(&[quote("3690.HK", dec!(100))]);

        assert_eq!(outcome.baselines_set, vec![("3690.HK".to_string(), dec!(100))]);
        assert!(outcome.alerts.is_empty());
        assert_eq!(tracker.baseline_for("3690.HK"), Some(dec!(100)));
    }

    #[test]
    fn test_baseline_is_never_overwritten() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("3690.HK", dec!(100))]);
        tracker.check_alerts(&[quote("3690.HK", dec!(105))]);

        assert_eq!(tracker.baseline_for("3690.HK"), Some(dec!(100)));
    }

    #[test]
    fn test_alert_threshold_boundary() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("3690.HK", dec!(100))]);

        // 1.4% — below threshold, no alert.
        let outcome = tracker.check_alerts(&[quote("3690.HK", dec!(101.4))]);
        assert!(outcome.alerts.is_empty());

        // 1.6% — fires.
        let outcome = tracker.check_alerts(&[quote("3690.HK", dec!(101.6))]);
        assert_eq!(outcome.alerts.len(), 1);
        let alert = &outcome.alerts[0];
        assert_eq!(alert.direction, Direction::Up);
        assert_eq!(alert.baseline, dec!(100));
        assert_eq!(alert.price, dec!(101.6));
        assert!(alert.to_string().contains("上涨 1.60%"));
    }

    #[test]
    fn test_alert_fires_at_exact_threshold() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("2015.HK", dec!(200))]);

        // Exactly 1.5% — the comparison is >=.
        let outcome = tracker.check_alerts(&[quote("2015.HK", dec!(203))]);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].pct, dec!(1.5));
    }

    #[test]
    fn test_downward_alert_direction() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("9618.HK", dec!(100))]);

        let outcome = tracker.check_alerts(&[quote("9618.HK", dec!(98))]);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].direction, Direction::Down);
        assert!(outcome.alerts[0].to_string().contains("下跌 2.00%"));
    }

    #[test]
    fn test_indicator_sequence() {
        let mut tracker = ChangeTracker::new(dec!(1.5));

        assert_eq!(tracker.indicator("3690.HK", dec!(100)), Indicator::Flat);
        assert_eq!(tracker.indicator("3690.HK", dec!(101)), Indicator::Up);
        assert_eq!(tracker.indicator("3690.HK", dec!(99.5)), Indicator::Down);
        assert_eq!(tracker.indicator("3690.HK", dec!(99.5)), Indicator::Flat);
    }

    #[test]
    fn test_equal_price_leaves_previous_untouched() {
        let mut tracker = ChangeTracker::new(dec!(1.5));

        assert_eq!(tracker.indicator("2015.HK", dec!(50.0)), Indicator::Flat);
        assert_eq!(tracker.indicator("2015.HK", dec!(50.0)), Indicator::Flat);
        assert_eq!(tracker.previous_for("2015.HK"), Some(dec!(50.0)));
    }

    #[test]
    fn test_symbols_are_tracked_independently() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("3690.HK", dec!(100)), quote("9618.HK", dec!(40))]);

        let outcome = tracker.check_alerts(&[
            quote("3690.HK", dec!(100.5)), // 0.5% — quiet
            quote("9618.HK", dec!(41)),    // 2.5% — fires
        ]);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].code, "9618.HK");
    }

    #[test]
    fn test_new_symbol_mid_run_gets_baseline_not_alert() {
        let mut tracker = ChangeTracker::new(dec!(1.5));
        tracker.check_alerts(&[quote("3690.HK", dec!(100))]);

        let outcome = tracker.check_alerts(&[
            quote("3690.HK", dec!(110)),
            quote("2015.HK", dec!(68.35)),
        ]);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].code, "3690.HK");
        assert_eq!(outcome.baselines_set, vec![("2015.HK".to_string(), dec!(68.35))]);
    }
}
