//! Bitstamp ticker.
//!
//! ```text
//! {"high", "last", "timestamp", "bid", "vwap", "volume", "low", "ask", "open"}
//! ```
//! `last` is the last trade price, `open` the first price of the day.
//! 24h aggregates (high/low/volume/vwap) are carried as auxiliary fields.

use serde_json::Value;

use super::{FeedAdapter, as_object, auxiliary, optional, required, timestamp};
use crate::error::TrackerError;
use crate::types::Quote;

pub struct BitstampAdapter;

impl FeedAdapter for BitstampAdapter {
    fn name(&self) -> &'static str {
        "bitstamp"
    }

    fn adapt(&self, payload: &Value, symbol: &str, observed_at: i64) -> Result<Quote, TrackerError> {
        let feed = self.name();
        let obj = as_object(payload, feed)?;

        let current = required(obj.get("last"), "last", feed)?;
        let open = optional(obj.get("open"), "open", feed)?;
        let ts = timestamp(obj.get("timestamp"), observed_at, feed)?;

        let mut q = Quote::new(symbol, current, ts);
        q.open = open;
        q.high = auxiliary(obj.get("high"), "high", feed)?;
        q.low = auxiliary(obj.get("low"), "low", feed)?;
        q.volume = auxiliary(obj.get("volume"), "volume", feed)?;
        q.bid = auxiliary(obj.get("bid"), "bid", feed)?;
        q.ask = auxiliary(obj.get("ask"), "ask", feed)?;
        q.vwap = auxiliary(obj.get("vwap"), "vwap", feed)?;
        Ok(q)
    }
}
