use std::collections::HashMap;

/// Remembers when each condition key last fired and enforces a cooldown.
///
/// Keys are registered when a tracker is set up and are never removed.
/// Unknown keys behave as if they last fired at the epoch.
#[derive(Debug, Clone, Default)]
pub struct DebounceLedger {
    last_fired: HashMap<String, i64>,
}

impl DebounceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with `keys` registered as never fired.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            last_fired: keys.into_iter().map(|k| (k.into(), 0)).collect(),
        }
    }

    /// Check whether `key` may fire at `timestamp` and, if so, record it.
    ///
    /// Eligible when `wait_time == 0` or `timestamp - last_fired > wait_time`.
    /// A suppressed key keeps its previous last-fired time.
    pub fn eligible_and_record(&mut self, key: &str, timestamp: i64, wait_time: u64) -> bool {
        let last = self.last_fired(key).unwrap_or(0);
        let wait = i64::try_from(wait_time).unwrap_or(i64::MAX);

        let eligible = wait_time == 0 || timestamp.saturating_sub(last) > wait;
        if eligible {
            self.last_fired.insert(key.to_string(), timestamp);
        }
        eligible
    }

    pub fn last_fired(&self, key: &str) -> Option<i64> {
        self.last_fired.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_key_is_eligible() {
        let mut ledger = DebounceLedger::new();

        assert!(ledger.eligible_and_record("day_change", 1_000, 60));
        assert_eq!(ledger.last_fired("day_change"), Some(1_000));
    }

    #[test]
    fn suppresses_inside_cooldown_and_fires_after() {
        let t = 1_700_000_000;
        let mut ledger = DebounceLedger::with_keys(["lag_change"]);

        assert!(ledger.eligible_and_record("lag_change", t, 60));
        assert!(!ledger.eligible_and_record("lag_change", t + 30, 60));
        // Boundary is strict.
        assert!(!ledger.eligible_and_record("lag_change", t + 60, 60));
        assert!(ledger.eligible_and_record("lag_change", t + 61, 60));
        assert_eq!(ledger.last_fired("lag_change"), Some(t + 61));
    }

    #[test]
    fn suppression_does_not_update_last_fired() {
        let mut ledger = DebounceLedger::new();

        assert!(ledger.eligible_and_record("enter_up", 100, 50));
        assert!(!ledger.eligible_and_record("enter_up", 140, 50));
        assert_eq!(ledger.last_fired("enter_up"), Some(100));
        // Measured from 100, not from the suppressed 140.
        assert!(ledger.eligible_and_record("enter_up", 151, 50));
    }

    #[test]
    fn zero_wait_never_suppresses() {
        let mut ledger = DebounceLedger::new();

        assert!(ledger.eligible_and_record("exit_down", 10, 0));
        assert!(ledger.eligible_and_record("exit_down", 10, 0));
        assert!(ledger.eligible_and_record("exit_down", 9, 0));
    }

    #[test]
    fn keys_are_independent() {
        let mut ledger = DebounceLedger::with_keys(["enter_up", "exit_down"]);

        assert!(ledger.eligible_and_record("enter_up", 1_000, 60));
        assert!(ledger.eligible_and_record("exit_down", 1_010, 60));
        assert!(!ledger.eligible_and_record("enter_up", 1_020, 60));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn huge_wait_time_suppresses_without_overflow() {
        let mut ledger = DebounceLedger::with_keys(["k"]);

        assert!(!ledger.eligible_and_record("k", i64::MAX, u64::MAX));
        assert!(!ledger.eligible_and_record("k", i64::MIN, 1));
        assert_eq!(ledger.last_fired("k"), Some(0));
    }
}
