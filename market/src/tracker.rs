//! Tracker
//!
//! Owns everything stateful about one tracked symbol:
//!   • the feed adapter resolved at setup
//!   • the quote history
//!   • the debounce ledger
//!   • the configured pulses, in evaluation order (range, day-change, lag-change)
//!
//! A tracker is driven serially: `poll` takes `&mut self`, so two polls of the
//! same tracker can never overlap. Separate trackers share nothing.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::adapter::{AdapterRegistry, FeedAdapter};
use crate::config::TrackerConfig;
use crate::debounce::DebounceLedger;
use crate::error::TrackerError;
use crate::history::QuoteHistory;
use crate::pulse::{DayChangePulse, LagChangePulse, Pulse, PulseKind, RangePulse};
use crate::types::Event;

pub struct Tracker {
    config: TrackerConfig,
    feed_identity: String,
    adapter: Arc<dyn FeedAdapter>,
    history: QuoteHistory,
    ledger: DebounceLedger,
    pulses: Vec<Box<dyn Pulse>>,
    /// Range or day-change is configured and the feed shape carries `open`.
    requires_open: bool,
}

impl Tracker {
    /// Validate `config` and resolve the adapter for `feed_identity`.
    ///
    /// Fails with `InvalidConfig` or `UnsupportedFeed`; both are setup errors
    /// and are not retried.
    pub fn new(
        config: TrackerConfig,
        feed_identity: impl Into<String>,
        registry: &AdapterRegistry,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let feed_identity = feed_identity.into();
        let adapter = registry.resolve(&feed_identity)?;

        let mut pulses: Vec<Box<dyn Pulse>> = Vec::new();
        if let Some((lo, hi)) = config.range() {
            pulses.push(Box::new(RangePulse::new(lo, hi)));
        }
        if let Some(limit) = config.day_limit {
            pulses.push(Box::new(DayChangePulse::new(limit)));
        }
        if let Some(rule) = config.lag {
            pulses.push(Box::new(LagChangePulse::new(rule)));
        }

        let ledger = DebounceLedger::with_keys(pulses.iter().flat_map(|p| p.debounce_keys()));

        if config.day_limit.is_some() && !adapter.provides_open() {
            warn!(
                symbol = %config.symbol,
                feed = %feed_identity,
                adapter = adapter.name(),
                "day_limit configured but the feed has no opening price, day-change will never fire"
            );
        }
        let requires_open = (config.range().is_some() || config.day_limit.is_some())
            && adapter.provides_open();

        debug!(
            symbol = %config.symbol,
            feed = %feed_identity,
            adapter = adapter.name(),
            pulses = pulses.len(),
            "tracker set up"
        );

        Ok(Self {
            history: QuoteHistory::new(config.history_capacity),
            config,
            feed_identity,
            adapter,
            ledger,
            pulses,
            requires_open,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn feed_identity(&self) -> &str {
        &self.feed_identity
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn history(&self) -> &QuoteHistory {
        &self.history
    }

    pub fn ledger(&self) -> &DebounceLedger {
        &self.ledger
    }

    pub fn pulse_kinds(&self) -> Vec<PulseKind> {
        self.pulses.iter().map(|p| p.kind()).collect()
    }

    /// Poll with the current wall-clock time as observation time.
    pub fn poll(&mut self, payload: &Value) -> Vec<Event> {
        self.poll_at(payload, crate::time::now_secs())
    }

    /// Poll, turning a malformed payload into a single `error` event.
    pub fn poll_at(&mut self, payload: &Value, observed_at: i64) -> Vec<Event> {
        match self.try_poll_at(payload, observed_at) {
            Ok(events) => events,
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "poll failed");
                vec![self.error_event(&e.to_string())]
            }
        }
    }

    /// Adapt, append and evaluate. On error the history is left untouched.
    ///
    /// A quote without `open` is malformed when range or day-change detection
    /// is configured on a feed that normally carries it.
    #[instrument(skip(self, payload), fields(symbol = %self.config.symbol), level = "debug")]
    pub fn try_poll_at(
        &mut self,
        payload: &Value,
        observed_at: i64,
    ) -> Result<Vec<Event>, TrackerError> {
        let quote = self
            .adapter
            .adapt(payload, &self.config.symbol, observed_at)?;
        if self.requires_open && quote.open.is_none() {
            return Err(TrackerError::malformed(
                self.adapter.name(),
                "missing field 'open'",
            ));
        }
        let ts = quote.timestamp;
        debug!(quote = %quote, "quote appended");
        self.history.append(quote);

        let mut events = Vec::new();
        for pulse in &self.pulses {
            let Some(signal) = pulse.evaluate(&self.history) else {
                continue;
            };

            let key = signal.debounce_key();
            if self
                .ledger
                .eligible_and_record(&key, ts, self.config.wait_time)
            {
                events.push(signal.to_event());
            } else {
                debug!(key = %key, ts, wait_time = self.config.wait_time, "signal suppressed by cooldown");
            }
        }

        if events.is_empty() {
            if let Some(q) = self.history.current() {
                debug!("no event signaled for {q}");
            }
        } else {
            info!(
                count = events.len(),
                tags = ?events.iter().map(|e| e.tag.as_str()).collect::<Vec<_>>(),
                "events signaled"
            );
        }

        Ok(events)
    }

    /// Error event for a failure concerning this tracker (adapter or fetch).
    pub fn error_event(&self, reason: &str) -> Event {
        Event::error(
            self.config.symbol.clone(),
            format!("{} poll failed", self.config.symbol),
            format!(
                "Tracker {} on feed '{}' failed: {reason}",
                self.config.symbol, self.feed_identity
            ),
        )
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("config", &self.config)
            .field("feed_identity", &self.feed_identity)
            .field("adapter", &self.adapter.name())
            .field("history_len", &self.history.len())
            .field("pulses", &self.pulse_kinds())
            .finish()
    }
}
