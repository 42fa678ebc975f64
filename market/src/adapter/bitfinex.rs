//! Bitfinex v1 pubticker.
//!
//! ```text
//! {"mid", "bid", "ask", "last_price", "low", "high", "volume", "timestamp"}
//! ```
//! There is no opening price, so day-change detection never fires on this feed.

use serde_json::Value;

use super::{FeedAdapter, as_object, auxiliary, required, timestamp};
use crate::error::TrackerError;
use crate::types::Quote;

pub struct BitfinexAdapter;

impl FeedAdapter for BitfinexAdapter {
    fn name(&self) -> &'static str {
        "bitfinex"
    }

    fn provides_open(&self) -> bool {
        false
    }

    fn adapt(&self, payload: &Value, symbol: &str, observed_at: i64) -> Result<Quote, TrackerError> {
        let feed = self.name();
        let obj = as_object(payload, feed)?;

        let current = required(obj.get("last_price"), "last_price", feed)?;
        let ts = timestamp(obj.get("timestamp"), observed_at, feed)?;

        let mut q = Quote::new(symbol, current, ts);
        q.mid = auxiliary(obj.get("mid"), "mid", feed)?;
        q.bid = auxiliary(obj.get("bid"), "bid", feed)?;
        q.ask = auxiliary(obj.get("ask"), "ask", feed)?;
        q.low = auxiliary(obj.get("low"), "low", feed)?;
        q.high = auxiliary(obj.get("high"), "high", feed)?;
        q.volume = auxiliary(obj.get("volume"), "volume", feed)?;
        Ok(q)
    }
}
