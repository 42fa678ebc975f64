//! Day-change Pulse
//!
//! ```text
//! change_pct = (current - open) / open * 100
//! ```
//! Fires when `change_pct` is outside `(-day_limit, +day_limit)`.
//! A quote without `open`, or with `open == 0`, disables the pulse for that poll.

use tracing::debug;

use super::{Pulse, PulseKind, Signal, SignalDetails, change_pct, outside_band};
use crate::history::QuoteHistory;

pub const DEBOUNCE_KEY: &str = "day_change";

#[derive(Debug, Clone, Copy)]
pub struct DayChangePulse {
    day_limit: f64,
}

impl DayChangePulse {
    pub fn new(day_limit: f64) -> Self {
        Self { day_limit }
    }
}

impl Pulse for DayChangePulse {
    fn kind(&self) -> PulseKind {
        PulseKind::DayChange
    }

    fn debounce_keys(&self) -> Vec<String> {
        vec![DEBOUNCE_KEY.to_string()]
    }

    fn evaluate(&self, history: &QuoteHistory) -> Option<Signal> {
        let current = history.current()?;

        let Some(open) = current.open else {
            debug!(symbol = %current.symbol, "no open value, day-change skipped");
            return None;
        };
        let Some(pct) = change_pct(current.current, open) else {
            debug!(symbol = %current.symbol, open, "unusable open value, day-change skipped");
            return None;
        };

        if !outside_band(pct, self.day_limit) {
            return None;
        }

        Some(Signal {
            symbol: current.symbol.clone(),
            timestamp: current.timestamp,
            details: SignalDetails::DayChange {
                price: current.current,
                open,
                change_pct: pct,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quote;

    fn eval(limit: f64, quote: Quote) -> Option<f64> {
        let mut h = QuoteHistory::new(5);
        h.append(quote);
        match DayChangePulse::new(limit).evaluate(&h)?.details {
            SignalDetails::DayChange { change_pct, .. } => Some(change_pct),
            _ => None,
        }
    }

    #[test]
    fn fires_outside_band() {
        let pct = eval(10.0, Quote::new("XTZUSD", 1.101, 0).with_open(1.0)).unwrap();
        assert!((pct - 10.1).abs() < 1e-9);

        let pct = eval(10.0, Quote::new("XTZUSD", 0.8, 0).with_open(1.0)).unwrap();
        assert!((pct + 20.0).abs() < 1e-9);
    }

    #[test]
    fn quiet_inside_band() {
        assert_eq!(eval(10.0, Quote::new("XTZUSD", 1.099, 0).with_open(1.0)), None);
        assert_eq!(eval(10.0, Quote::new("XTZUSD", 0.95, 0).with_open(1.0)), None);
    }

    #[test]
    fn fires_exactly_at_limit() {
        assert!(eval(50.0, Quote::new("XTZUSD", 1.5, 0).with_open(1.0)).is_some());
    }

    #[test]
    fn disabled_without_usable_open() {
        assert_eq!(eval(1.0, Quote::new("XTZUSD", 5.0, 0)), None);
        assert_eq!(eval(1.0, Quote::new("XTZUSD", 5.0, 0).with_open(0.0)), None);
    }

    #[test]
    fn empty_history_is_silent() {
        assert!(DayChangePulse::new(1.0).evaluate(&QuoteHistory::new(5)).is_none());
    }
}
