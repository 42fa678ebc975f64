use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::history::DEFAULT_CAPACITY;

/// Configuration of a single ticker tracker.
///
/// ```json
/// { "symbol": "XTZUSD", "lo": 1.1, "hi": 1.2, "day_limit": 10.0,
///   "lag": [20.0, 1], "wait_time": 600, "history_capacity": 100 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    pub symbol: String,

    /// Lower range bound. Defaults to 0 when only `hi` is given.
    #[serde(default)]
    pub lo: Option<f64>,

    /// Upper range bound. Defaults to +inf when only `lo` is given.
    #[serde(default)]
    pub hi: Option<f64>,

    /// Day-change band in percent: fires outside `(-day_limit, +day_limit)`.
    #[serde(default)]
    pub day_limit: Option<f64>,

    #[serde(default)]
    pub lag: Option<LagRule>,

    /// Cooldown in seconds shared by every condition of the tracker.
    #[serde(default)]
    pub wait_time: u64,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Lag-change rule, written as `[percent, offset]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, usize)", into = "(f64, usize)")]
pub struct LagRule {
    /// Fires outside `(-pct, +pct)`.
    pub pct: f64,
    /// Number of observations back to compare against (>= 1).
    pub offset: usize,
}

impl From<(f64, usize)> for LagRule {
    fn from((pct, offset): (f64, usize)) -> Self {
        Self { pct, offset }
    }
}

impl From<LagRule> for (f64, usize) {
    fn from(rule: LagRule) -> Self {
        (rule.pct, rule.offset)
    }
}

impl TrackerConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            lo: None,
            hi: None,
            day_limit: None,
            lag: None,
            wait_time: 0,
            history_capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_range(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        self.lo = lo;
        self.hi = hi;
        self
    }

    pub fn with_day_limit(mut self, pct: f64) -> Self {
        self.day_limit = Some(pct);
        self
    }

    pub fn with_lag(mut self, pct: f64, offset: usize) -> Self {
        self.lag = Some(LagRule { pct, offset });
        self
    }

    pub fn with_wait_time(mut self, secs: u64) -> Self {
        self.wait_time = secs;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Effective `(lo, hi)` interval, or `None` when range detection is off.
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.lo, self.hi) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(0.0), hi.unwrap_or(f64::INFINITY))),
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let invalid = |msg: String| Err(TrackerError::InvalidConfig(msg));

        if self.symbol.trim().is_empty() {
            return invalid("symbol must not be empty".into());
        }

        for (name, bound) in [("lo", self.lo), ("hi", self.hi)] {
            if let Some(v) = bound {
                if !v.is_finite() {
                    return invalid(format!("{name} must be finite, got {v}"));
                }
            }
        }

        if let Some((lo, hi)) = self.range() {
            if lo >= hi {
                return invalid(format!("range requires lo < hi, got [{lo}, {hi})"));
            }
        }

        if let Some(limit) = self.day_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return invalid(format!("day_limit must be a positive percentage, got {limit}"));
            }
        }

        if self.history_capacity < 2 {
            return invalid(format!(
                "history_capacity must be at least 2, got {}",
                self.history_capacity
            ));
        }

        if let Some(rule) = self.lag {
            if !(rule.pct.is_finite() && rule.pct > 0.0) {
                return invalid(format!("lag percent must be positive, got {}", rule.pct));
            }
            if rule.offset == 0 {
                return invalid("lag offset must be at least 1".into());
            }
            if rule.offset >= self.history_capacity {
                return invalid(format!(
                    "lag offset {} needs history_capacity > {}, got {}",
                    rule.offset, rule.offset, self.history_capacity
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_full_config() {
        let cfg: TrackerConfig = serde_json::from_value(json!({
            "symbol": "XTZUSD", "lo": 1.1, "hi": 1.2, "day_limit": 10.0,
            "lag": [20.0, 1], "wait_time": 600
        }))
        .unwrap();

        assert_eq!(cfg.range(), Some((1.1, 1.2)));
        assert_eq!(cfg.lag, Some(LagRule { pct: 20.0, offset: 1 }));
        assert_eq!(cfg.wait_time, 600);
        assert_eq!(cfg.history_capacity, DEFAULT_CAPACITY);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn minimal_config_disables_everything() {
        let cfg: TrackerConfig = serde_json::from_value(json!({"symbol": "XTZUSD"})).unwrap();

        assert_eq!(cfg, TrackerConfig::new("XTZUSD"));
        assert_eq!(cfg.range(), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn legacy_field_names_are_rejected() {
        let res: Result<TrackerConfig, _> =
            serde_json::from_value(json!({"symbol": "XTZUSD", "change_day": 5.0}));
        assert!(res.is_err());
    }

    #[test]
    fn one_sided_ranges_get_defaults() {
        let only_hi = TrackerConfig::new("X").with_range(None, Some(2.0));
        let only_lo = TrackerConfig::new("X").with_range(Some(1.0), None);

        assert_eq!(only_hi.range(), Some((0.0, 2.0)));
        assert_eq!(only_lo.range(), Some((1.0, f64::INFINITY)));
        assert!(only_hi.validate().is_ok());
        assert!(only_lo.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_range() {
        let cfg = TrackerConfig::new("X").with_range(Some(1.2), Some(1.1));
        assert!(matches!(cfg.validate(), Err(TrackerError::InvalidConfig(_))));

        let only_hi_below_zero = TrackerConfig::new("X").with_range(None, Some(-1.0));
        assert!(only_hi_below_zero.validate().is_err());
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(TrackerConfig::new("X").with_day_limit(0.0).validate().is_err());
        assert!(TrackerConfig::new("X").with_lag(20.0, 0).validate().is_err());
        assert!(TrackerConfig::new("X").with_lag(-1.0, 1).validate().is_err());
        assert!(
            TrackerConfig::new("X")
                .with_lag(5.0, 3)
                .with_history_capacity(3)
                .validate()
                .is_err()
        );
        assert!(TrackerConfig::new(" ").validate().is_err());
    }

    #[test]
    fn lag_rule_round_trips_as_pair() {
        let v = serde_json::to_value(LagRule { pct: 2.5, offset: 3 }).unwrap();
        assert_eq!(v, json!([2.5, 3]));
    }
}
