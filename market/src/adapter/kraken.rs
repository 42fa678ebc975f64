//! Kraken public ticker.
//!
//! ```text
//! {"error":[],"result":{"XTZUSD":{
//!     "a":["1.963400","1135","1135.000"], "b":["1.960200","829","829.000"],
//!     "c":["1.953400","169.08"], "v":["162651.08","733026.03"],
//!     "p":["1.929881","1.904369"], "t":[397,1553],
//!     "l":["1.896800","1.894300"], "h":["1.993500","2.007000"], "o":"1.974000"}}}
//! ```
//! Arrays hold `[today, last 24h]` (or `[price, lot, ...]` for a/b/c).
//! The payload has no timestamp.

use serde_json::{Map, Value};

use super::{FeedAdapter, as_object, auxiliary, nth, optional, required};
use crate::error::TrackerError;
use crate::types::Quote;

pub struct KrakenAdapter;

impl KrakenAdapter {
    /// The per-pair object: keyed by the upper-cased symbol, or the only entry.
    fn pair_object<'a>(
        result: &'a Map<String, Value>,
        symbol: &str,
        feed: &str,
    ) -> Result<&'a Value, TrackerError> {
        if let Some(pair) = result.get(&symbol.to_uppercase()) {
            return Ok(pair);
        }

        let mut entries = result.values();
        match (entries.next(), entries.next()) {
            (Some(only), None) => Ok(only),
            _ => Err(TrackerError::malformed(
                feed,
                format!(
                    "expected one pair in result, found {} without key '{}'",
                    result.len(),
                    symbol.to_uppercase()
                ),
            )),
        }
    }
}

impl FeedAdapter for KrakenAdapter {
    fn name(&self) -> &'static str {
        "kraken"
    }

    fn adapt(&self, payload: &Value, symbol: &str, observed_at: i64) -> Result<Quote, TrackerError> {
        let feed = self.name();
        let obj = as_object(payload, feed)?;

        if let Some(Value::Array(errors)) = obj.get("error") {
            if !errors.is_empty() {
                return Err(TrackerError::malformed(
                    feed,
                    format!("feed reported errors: {}", Value::Array(errors.clone())),
                ));
            }
        }

        let result = obj
            .get("result")
            .ok_or_else(|| TrackerError::malformed(feed, "missing field 'result'"))
            .and_then(|r| as_object(r, feed))?;
        let pair = as_object(Self::pair_object(result, symbol, feed)?, feed)?;

        let current = required(nth(pair.get("c"), 0), "c[0]", feed)?;
        let mut q = Quote::new(symbol, current, observed_at);
        q.open = optional(pair.get("o"), "o", feed)?;
        q.high = auxiliary(nth(pair.get("h"), 0), "h[0]", feed)?;
        q.low = auxiliary(nth(pair.get("l"), 0), "l[0]", feed)?;
        q.volume = auxiliary(nth(pair.get("v"), 1), "v[1]", feed)?;
        q.bid = auxiliary(nth(pair.get("b"), 0), "b[0]", feed)?;
        q.ask = auxiliary(nth(pair.get("a"), 0), "a[0]", feed)?;
        q.vwap = auxiliary(nth(pair.get("p"), 1), "p[1]", feed)?;
        Ok(q)
    }
}
