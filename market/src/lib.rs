//! Ticker event-detection engine.
//!
//! Data flow for a single poll:
//! raw payload → adapter → `Quote` → history → pulses → debounce ledger → `Event`s

pub mod adapter;
pub mod config;
pub mod debounce;
pub mod error;
pub mod history;
pub mod pulse;
pub mod time;
pub mod tracker;
pub mod types;

pub use adapter::{AdapterRegistry, FeedAdapter};
pub use config::{LagRule, TrackerConfig};
pub use debounce::DebounceLedger;
pub use error::TrackerError;
pub use history::QuoteHistory;
pub use tracker::Tracker;
pub use types::{Direction, Event, EventTag, Quote};
