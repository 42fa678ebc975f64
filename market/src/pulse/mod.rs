//! Condition pulses.
//!
//! A pulse looks at the quote history after the newest quote was appended and
//! decides whether its condition fires. Pulses are stateless: everything they
//! need lives in the history. Cooldown handling is done by the tracker through
//! the debounce ledger, keyed by [`Signal::debounce_key`].

pub mod day_change;
pub mod lag_change;
pub mod range;

use std::fmt;

use crate::history::QuoteHistory;
use crate::types::{Direction, Event, EventTag};

pub use day_change::DayChangePulse;
pub use lag_change::LagChangePulse;
pub use range::RangePulse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseKind {
    Range,
    DayChange,
    LagChange,
}

pub trait Pulse: Send + Sync {
    fn kind(&self) -> PulseKind;

    /// Every ledger key this pulse can produce.
    fn debounce_keys(&self) -> Vec<String>;

    /// Returns `Some(Signal)` when the condition holds for the newest quote.
    fn evaluate(&self, history: &QuoteHistory) -> Option<Signal>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeAction {
    Enter,
    Exit,
    Cross,
}

impl RangeAction {
    pub const ALL: [RangeAction; 3] = [RangeAction::Enter, RangeAction::Exit, RangeAction::Cross];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeAction::Enter => "enter",
            RangeAction::Exit => "exit",
            RangeAction::Cross => "cross",
        }
    }

    pub fn tag(&self) -> EventTag {
        match self {
            RangeAction::Enter => EventTag::RangeEnter,
            RangeAction::Exit => EventTag::RangeExit,
            RangeAction::Cross => EventTag::RangeCross,
        }
    }
}

impl fmt::Display for RangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fired condition, before debouncing.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    /// Timestamp of the quote that fired the condition.
    pub timestamp: i64,
    pub details: SignalDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalDetails {
    Range {
        action: RangeAction,
        direction: Direction,
        price: f64,
        prev_price: f64,
        lo: f64,
        hi: f64,
    },
    DayChange {
        price: f64,
        open: f64,
        change_pct: f64,
    },
    LagChange {
        price: f64,
        lag_price: f64,
        offset: usize,
        change_pct: f64,
    },
}

impl Signal {
    pub fn tag(&self) -> EventTag {
        match &self.details {
            SignalDetails::Range { action, .. } => action.tag(),
            SignalDetails::DayChange { .. } => EventTag::DayChange,
            SignalDetails::LagChange { .. } => EventTag::LagChange,
        }
    }

    /// `"{action}_{direction}"` for range signals, the tag otherwise.
    pub fn debounce_key(&self) -> String {
        match &self.details {
            SignalDetails::Range {
                action, direction, ..
            } => range_key(*action, *direction),
            SignalDetails::DayChange { .. } => day_change::DEBOUNCE_KEY.to_string(),
            SignalDetails::LagChange { .. } => lag_change::DEBOUNCE_KEY.to_string(),
        }
    }

    pub fn short_text(&self) -> String {
        let s = &self.symbol;
        match &self.details {
            SignalDetails::Range {
                action,
                direction,
                price,
                prev_price,
                lo,
                hi,
            } => format!(
                "{s} at {price:.3} (prev={prev_price:.3}) {action}{} [{lo:.3}-{hi:.3}]",
                direction.arrow()
            ),
            SignalDetails::DayChange {
                price,
                open,
                change_pct,
            } => format!("{s} at {price:.3} changes {change_pct:.2}% from open {open:.3}"),
            SignalDetails::LagChange {
                price,
                lag_price,
                offset,
                change_pct,
            } => format!(
                "{s} at {price:.3} changes {change_pct:.2}% from lag-{offset}({lag_price:.3})"
            ),
        }
    }

    pub fn long_text(&self) -> String {
        let s = &self.symbol;
        match &self.details {
            SignalDetails::Range {
                action,
                direction,
                price,
                prev_price,
                lo,
                hi,
            } => format!(
                "Pair {s} at {price:.3} (prev={prev_price:.3}) {action} ({direction}) the range [{lo:.3}-{hi:.3}]"
            ),
            SignalDetails::DayChange {
                price,
                open,
                change_pct,
            } => format!("Pair {s} at {price:.3} changes {change_pct:.2}% from open value {open:.3}"),
            SignalDetails::LagChange {
                price,
                lag_price,
                offset,
                change_pct,
            } => format!(
                "Pair {s} at {price:.3} changes {change_pct:.2}% from lag-{offset} value {lag_price:.3}"
            ),
        }
    }

    pub fn to_event(&self) -> Event {
        Event {
            tag: self.tag(),
            symbol: self.symbol.clone(),
            short_text: self.short_text(),
            long_text: self.long_text(),
        }
    }
}

pub(crate) fn range_key(action: RangeAction, direction: Direction) -> String {
    format!("{}_{}", action.as_str(), direction.as_str())
}

/// Percentage change of `current` relative to `reference`.
///
/// `None` when `reference` is zero or the result is not finite.
pub(crate) fn change_pct(current: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    let pct = (current - reference) / reference * 100.0;
    pct.is_finite().then_some(pct)
}

/// True when `pct` lies outside the open band `(-limit, +limit)`.
pub(crate) fn outside_band(pct: f64, limit: f64) -> bool {
    !(-limit < pct && pct < limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_signal(action: RangeAction, direction: Direction) -> Signal {
        Signal {
            symbol: "XTZUSD".into(),
            timestamp: 10,
            details: SignalDetails::Range {
                action,
                direction,
                price: 1.101,
                prev_price: 0.91,
                lo: 1.1,
                hi: 1.2,
            },
        }
    }

    #[test]
    fn range_signal_texts_and_key() {
        let sig = range_signal(RangeAction::Enter, Direction::Up);

        assert_eq!(sig.tag(), EventTag::RangeEnter);
        assert_eq!(sig.debounce_key(), "enter_up");
        assert_eq!(
            sig.short_text(),
            "XTZUSD at 1.101 (prev=0.910) enter\u{2191} [1.100-1.200]"
        );
        assert_eq!(
            sig.long_text(),
            "Pair XTZUSD at 1.101 (prev=0.910) enter (up) the range [1.100-1.200]"
        );
    }

    #[test]
    fn unbounded_range_prints_inf() {
        let mut sig = range_signal(RangeAction::Exit, Direction::Down);
        if let SignalDetails::Range { hi, .. } = &mut sig.details {
            *hi = f64::INFINITY;
        }
        assert!(sig.short_text().ends_with("exit\u{2193} [1.100-inf]"));
    }

    #[test]
    fn scalar_signal_texts() {
        let day = Signal {
            symbol: "XTZUSD".into(),
            timestamp: 0,
            details: SignalDetails::DayChange {
                price: 0.8,
                open: 1.0,
                change_pct: -20.0,
            },
        };
        assert_eq!(day.debounce_key(), "day_change");
        assert_eq!(day.short_text(), "XTZUSD at 0.800 changes -20.00% from open 1.000");

        let lag = Signal {
            symbol: "XTZUSD".into(),
            timestamp: 0,
            details: SignalDetails::LagChange {
                price: 1.101,
                lag_price: 0.91,
                offset: 1,
                change_pct: 20.989,
            },
        };
        let ev = lag.to_event();
        assert_eq!(ev.tag, EventTag::LagChange);
        assert_eq!(ev.short_text, "XTZUSD at 1.101 changes 20.99% from lag-1(0.910)");
        assert_eq!(
            ev.long_text,
            "Pair XTZUSD at 1.101 changes 20.99% from lag-1 value 0.910"
        );
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert!(!outside_band(9.99, 10.0));
        assert!(outside_band(10.0, 10.0));
        assert!(outside_band(-10.0, 10.0));
        assert!(!outside_band(0.0, 10.0));
    }

    #[test]
    fn change_pct_guards_zero_reference() {
        assert_eq!(change_pct(1.0, 0.0), None);
        assert_eq!(change_pct(1.5, 1.0), Some(50.0));
    }
}
