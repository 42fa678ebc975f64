//! Feed adapters.
//!
//! Each supported data feed returns its own JSON shape. An adapter maps one
//! shape into the canonical [`Quote`]. Adapters are looked up by name in an
//! [`AdapterRegistry`] once, when a tracker is set up.
//!
//! ## Numeric fields
//! Feeds send numbers either as JSON numbers or as numeric strings
//! (`"1.9534"`). Both are accepted. Non-finite values are rejected.
//!
//! ## Missing fields
//! - `current` missing or unparseable → `MalformedPayload`
//! - `open` missing → `Quote::open` is `None`; the tracker decides whether its
//!   pulses need it
//! - timestamp missing → wall-clock time of the observation
//! - auxiliary field missing → [`crate::types::MISSING`]

pub mod bitfinex;
pub mod bitstamp;
pub mod kraken;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::TrackerError;
use crate::types::{MISSING, Quote};

/// Maps one feed's payload shape into a [`Quote`].
pub trait FeedAdapter: Send + Sync {
    /// Registry key. Matched case-insensitively against feed identities.
    fn name(&self) -> &'static str;

    /// Whether this feed shape carries an opening price at all.
    fn provides_open(&self) -> bool {
        true
    }

    /// `observed_at` (Unix seconds) is used when the payload carries no timestamp.
    fn adapt(&self, payload: &Value, symbol: &str, observed_at: i64)
    -> Result<Quote, TrackerError>;
}

#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn FeedAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in feed shape.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(bitstamp::BitstampAdapter));
        reg.register(Arc::new(kraken::KrakenAdapter));
        reg.register(Arc::new(bitfinex::BitfinexAdapter));
        reg
    }

    /// Register an adapter. Replaces any adapter with the same name.
    pub fn register(&mut self, adapter: Arc<dyn FeedAdapter>) {
        self.adapters
            .insert(adapter.name().to_ascii_lowercase(), adapter);
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a feed identity to an adapter.
    ///
    /// An exact (case-insensitive) name wins. Otherwise the identity may be a
    /// URL containing a registered name; the longest contained name is used.
    pub fn resolve(&self, feed_identity: &str) -> Result<Arc<dyn FeedAdapter>, TrackerError> {
        let needle = feed_identity.to_ascii_lowercase();

        if let Some(adapter) = self.adapters.get(&needle) {
            return Ok(Arc::clone(adapter));
        }

        self.adapters
            .iter()
            .filter(|(name, _)| needle.contains(name.as_str()))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, adapter)| Arc::clone(adapter))
            .ok_or_else(|| TrackerError::UnsupportedFeed(feed_identity.to_string()))
    }

    /// Resolve and adapt in one step, using the current wall-clock time.
    pub fn adapt(
        &self,
        payload: &Value,
        symbol: &str,
        feed_identity: &str,
    ) -> Result<Quote, TrackerError> {
        self.resolve(feed_identity)?
            .adapt(payload, symbol, crate::time::now_secs())
    }
}

// ---------------------------------------------------------
// Field extraction helpers shared by adapters
// ---------------------------------------------------------

/// Interpret a JSON value as a finite float.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

pub(crate) fn as_object<'a>(
    value: &'a Value,
    feed: &str,
) -> Result<&'a Map<String, Value>, TrackerError> {
    value
        .as_object()
        .ok_or_else(|| TrackerError::malformed(feed, "payload is not an object"))
}

/// Required numeric field.
pub(crate) fn required(value: Option<&Value>, field: &str, feed: &str) -> Result<f64, TrackerError> {
    let raw = value
        .filter(|v| !v.is_null())
        .ok_or_else(|| TrackerError::malformed(feed, format!("missing field '{field}'")))?;

    as_f64(raw)
        .ok_or_else(|| TrackerError::malformed(feed, format!("field '{field}' is not a number: {raw}")))
}

/// Optional numeric field; absent or null yields `None`, garbage is malformed.
pub(crate) fn optional(value: Option<&Value>, field: &str, feed: &str) -> Result<Option<f64>, TrackerError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required(value, field, feed).map(Some),
    }
}

/// Auxiliary numeric field; absent or null yields the sentinel.
pub(crate) fn auxiliary(value: Option<&Value>, field: &str, feed: &str) -> Result<f64, TrackerError> {
    match value {
        None | Some(Value::Null) => Ok(MISSING),
        Some(_) => required(value, field, feed),
    }
}

/// Feed timestamp in Unix seconds (fractions rounded), or `observed_at`.
pub(crate) fn timestamp(value: Option<&Value>, observed_at: i64, feed: &str) -> Result<i64, TrackerError> {
    match value {
        None | Some(Value::Null) => Ok(observed_at),
        Some(_) => required(value, "timestamp", feed).map(|t| t.round() as i64),
    }
}

/// Element `idx` of an array field (Kraken packs values as `[price, lot, ...]`).
pub(crate) fn nth<'a>(value: Option<&'a Value>, idx: usize) -> Option<&'a Value> {
    match value {
        Some(Value::Array(items)) => items.get(idx),
        _ => None,
    }
}
