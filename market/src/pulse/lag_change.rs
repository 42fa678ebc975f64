//! Lag-change Pulse
//!
//! Compares the current price with the price `offset` observations back:
//! ```text
//! change_pct = (current - lag(offset)) / lag(offset) * 100
//! ```
//! Fires when `change_pct` is outside `(-pct, +pct)`. Silent until the history
//! holds `offset + 1` quotes.

use super::{Pulse, PulseKind, Signal, SignalDetails, change_pct, outside_band};
use crate::config::LagRule;
use crate::history::QuoteHistory;

/// One key regardless of the offset: run several trackers for several lag rules.
pub const DEBOUNCE_KEY: &str = "lag_change";

#[derive(Debug, Clone, Copy)]
pub struct LagChangePulse {
    rule: LagRule,
}

impl LagChangePulse {
    pub fn new(rule: LagRule) -> Self {
        Self { rule }
    }
}

impl Pulse for LagChangePulse {
    fn kind(&self) -> PulseKind {
        PulseKind::LagChange
    }

    fn debounce_keys(&self) -> Vec<String> {
        vec![DEBOUNCE_KEY.to_string()]
    }

    fn evaluate(&self, history: &QuoteHistory) -> Option<Signal> {
        let current = history.current()?;
        let lagged = history.lag(self.rule.offset)?;

        let pct = change_pct(current.current, lagged.current)?;
        if !outside_band(pct, self.rule.pct) {
            return None;
        }

        Some(Signal {
            symbol: current.symbol.clone(),
            timestamp: current.timestamp,
            details: SignalDetails::LagChange {
                price: current.current,
                lag_price: lagged.current,
                offset: self.rule.offset,
                change_pct: pct,
            },
        })
    }
}
