use std::fmt;

use serde::Serialize;

/// Value stored in an auxiliary quote field the feed did not provide.
pub const MISSING: f64 = -1.0;

/// One normalized observation of a symbol at one instant.
///
/// `current` and `timestamp` are always present. `open` is optional and its
/// absence disables the day-change pulse. Auxiliary fields hold either a
/// finite float or [`MISSING`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub current: f64,
    pub open: Option<f64>,
    /// Unix seconds.
    pub timestamp: i64,

    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub bid: f64,
    pub ask: f64,
    pub vwap: f64,
    pub mid: f64,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, current: f64, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            current,
            open: None,
            timestamp,
            high: MISSING,
            low: MISSING,
            volume: MISSING,
            bid: MISSING,
            ask: MISSING,
            vwap: MISSING,
            mid: MISSING,
        }
    }

    pub fn with_open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Direction of the move from `previous` to `self`.
    pub fn direction_from(&self, previous: &Quote) -> Direction {
        if self.current > previous.current {
            Direction::Up
        } else if self.current < previous.current {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let utc = chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.to_string());

        write!(f, "Ticker {} at {:.3} (", self.symbol, self.current)?;
        if let Some(open) = self.open {
            write!(f, "open={open:.3}, ")?;
        }
        write!(f, "vol={:.1}, utc-time={utc})", self.volume)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Flat => "flat",
        }
    }

    /// Arrow used in short notification texts.
    pub fn arrow(&self) -> char {
        match self {
            Direction::Up => '\u{2191}',
            Direction::Down => '\u{2193}',
            Direction::Flat => '\u{2192}',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    RangeEnter,
    RangeExit,
    RangeCross,
    DayChange,
    LagChange,
    Error,
}

impl EventTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::RangeEnter => "range_enter",
            EventTag::RangeExit => "range_exit",
            EventTag::RangeCross => "range_cross",
            EventTag::DayChange => "day_change",
            EventTag::LagChange => "lag_change",
            EventTag::Error => "error",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a poll, consumed immediately by the delivery layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub tag: EventTag,
    pub symbol: String,
    pub short_text: String,
    pub long_text: String,
}

impl Event {
    pub fn error(
        symbol: impl Into<String>,
        short_text: impl Into<String>,
        long_text: impl Into<String>,
    ) -> Self {
        Self {
            tag: EventTag::Error,
            symbol: symbol.into(),
            short_text: short_text.into(),
            long_text: long_text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.tag == EventTag::Error
    }
}
