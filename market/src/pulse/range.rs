//! Range Pulse
//!
//! Detects a price moving into, out of, or across an interval `[lo, hi)`
//! between the previous and the current quote.
//!
//! ## Inside test
//! ```text
//! inside(q) = lo < q.current < hi
//! ```
//! Both bounds are strict: a quote sitting exactly on a bound is outside.
//!
//! ## Transitions
//! | previous | current | result |
//! |----------|---------|--------|
//! | outside  | inside  | enter  |
//! | inside   | outside | exit   |
//! | `<= lo`  | `>= hi` | cross  |
//! | `>= hi`  | `<= lo` | cross  |
//!
//! Anything else, or no previous quote, is not a signal.

use super::{Pulse, PulseKind, RangeAction, Signal, SignalDetails, range_key};
use crate::history::QuoteHistory;
use crate::types::{Direction, Quote};

#[derive(Debug, Clone, Copy)]
pub struct RangePulse {
    lo: f64,
    hi: f64,
}

impl RangePulse {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    fn inside(&self, q: &Quote) -> bool {
        self.lo < q.current && q.current < self.hi
    }

    /// Transition between `previous` and `current`, if any.
    pub fn action(&self, previous: &Quote, current: &Quote) -> Option<RangeAction> {
        match (self.inside(previous), self.inside(current)) {
            (false, true) => Some(RangeAction::Enter),
            (true, false) => Some(RangeAction::Exit),
            (false, false) => {
                let (p, c) = (previous.current, current.current);
                let upward = p <= self.lo && c >= self.hi;
                let downward = p >= self.hi && c <= self.lo;
                (upward || downward).then_some(RangeAction::Cross)
            }
            (true, true) => None,
        }
    }
}

impl Pulse for RangePulse {
    fn kind(&self) -> PulseKind {
        PulseKind::Range
    }

    fn debounce_keys(&self) -> Vec<String> {
        RangeAction::ALL
            .iter()
            .flat_map(|a| {
                [Direction::Up, Direction::Down, Direction::Flat]
                    .into_iter()
                    .map(move |d| range_key(*a, d))
            })
            .collect()
    }

    fn evaluate(&self, history: &QuoteHistory) -> Option<Signal> {
        let current = history.current()?;
        let previous = history.previous()?;

        let action = self.action(previous, current)?;

        Some(Signal {
            symbol: current.symbol.clone(),
            timestamp: current.timestamp,
            details: SignalDetails::Range {
                action,
                direction: current.direction_from(previous),
                price: current.current,
                prev_price: previous.current,
                lo: self.lo,
                hi: self.hi,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(price: f64) -> Quote {
        Quote::new("XTZUSD", price, 0)
    }

    fn history(prices: &[f64]) -> QuoteHistory {
        let mut h = QuoteHistory::new(10);
        for p in prices {
            h.append(q(*p));
        }
        h
    }

    fn pulse() -> RangePulse {
        RangePulse::new(1.1, 1.2)
    }

    fn fired(prices: &[f64]) -> Option<(RangeAction, Direction)> {
        match pulse().evaluate(&history(prices))?.details {
            SignalDetails::Range {
                action, direction, ..
            } => Some((action, direction)),
            _ => None,
        }
    }

    #[test]
    fn first_quote_never_fires() {
        assert_eq!(fired(&[1.15]), None);
    }

    #[test]
    fn enter_and_exit() {
        assert_eq!(fired(&[0.91, 1.101]), Some((RangeAction::Enter, Direction::Up)));
        assert_eq!(fired(&[1.101, 1.09]), Some((RangeAction::Exit, Direction::Down)));
        assert_eq!(fired(&[1.25, 1.15]), Some((RangeAction::Enter, Direction::Down)));
    }

    #[test]
    fn moves_that_stay_on_one_side_do_not_fire() {
        assert_eq!(fired(&[1.12, 1.18]), None);
        assert_eq!(fired(&[0.5, 0.9]), None);
        assert_eq!(fired(&[1.5, 1.3]), None);
    }

    #[test]
    fn bounds_count_as_outside() {
        // Exactly on lo: outside → inside is an enter.
        assert_eq!(fired(&[1.1, 1.15]), Some((RangeAction::Enter, Direction::Up)));
        // Inside → exactly on hi is an exit.
        assert_eq!(fired(&[1.15, 1.2]), Some((RangeAction::Exit, Direction::Up)));
        // lo → hi in one step is a cross.
        assert_eq!(fired(&[1.1, 1.2]), Some((RangeAction::Cross, Direction::Up)));
    }

    #[test]
    fn cross_in_both_directions() {
        assert_eq!(fired(&[0.8, 1.5]), Some((RangeAction::Cross, Direction::Up)));
        assert_eq!(fired(&[1.5, 0.8]), Some((RangeAction::Cross, Direction::Down)));
    }

    #[test]
    fn flat_move_never_transitions() {
        for p in [1.0, 1.1, 1.15, 1.2, 1.3] {
            assert_eq!(fired(&[p, p]), None);
        }
    }

    #[test]
    fn key_space_covers_all_directions() {
        let keys = pulse().debounce_keys();

        assert_eq!(keys.len(), 9);
        assert!(keys.contains(&"enter_up".to_string()));
        assert!(keys.contains(&"cross_down".to_string()));
        assert!(keys.contains(&"exit_flat".to_string()));
    }
}
