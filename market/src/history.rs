use std::collections::VecDeque;

use crate::types::Quote;

pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity, insertion-ordered buffer of quotes for one symbol.
///
/// Oldest quotes are evicted first once `capacity` is reached. All lookups
/// return `None` rather than failing when there is not enough data.
#[derive(Debug, Clone)]
pub struct QuoteHistory {
    quotes: VecDeque<Quote>,
    capacity: usize,
}

impl Default for QuoteHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QuoteHistory {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            quotes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, quote: Quote) {
        if self.quotes.len() >= self.capacity {
            self.quotes.pop_front();
        }
        self.quotes.push_back(quote);
    }

    pub fn current(&self) -> Option<&Quote> {
        self.quotes.back()
    }

    pub fn previous(&self) -> Option<&Quote> {
        self.lag(1)
    }

    /// Quote `n` positions back from the current one.
    ///
    /// `lag(0)` is always `None`: offsets start at 1.
    pub fn lag(&self, n: usize) -> Option<&Quote> {
        if n == 0 || n >= self.quotes.len() {
            return None;
        }
        self.quotes.get(self.quotes.len() - 1 - n)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn q(price: f64, ts: i64) -> Quote {
        Quote::new("XTZUSD", price, ts)
    }

    #[test]
    fn empty_history_has_nothing() {
        let h = QuoteHistory::default();

        assert!(h.is_empty());
        assert_eq!(h.capacity(), DEFAULT_CAPACITY);
        assert!(h.current().is_none());
        assert!(h.previous().is_none());
        assert!(h.lag(1).is_none());
    }

    #[test]
    fn current_previous_and_lag() {
        let mut h = QuoteHistory::new(10);
        h.append(q(1.0, 1));
        assert_eq!(h.current().unwrap().current, 1.0);
        assert!(h.previous().is_none());

        h.append(q(2.0, 2));
        h.append(q(3.0, 3));

        assert_eq!(h.current().unwrap().current, 3.0);
        assert_eq!(h.previous().unwrap().current, 2.0);
        assert_eq!(h.lag(2).unwrap().current, 1.0);
        assert!(h.lag(3).is_none());
        assert!(h.lag(0).is_none());
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut h = QuoteHistory::new(3);
        for i in 0..5 {
            h.append(q(i as f64, i));
        }

        assert_eq!(h.len(), 3);
        let prices: Vec<f64> = h.iter().map(|q| q.current).collect();
        assert_eq!(prices, vec![2.0, 3.0, 4.0]);
        assert_eq!(h.lag(2).unwrap().current, 2.0);
        assert!(h.lag(3).is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut h = QuoteHistory::new(0);
        h.append(q(1.0, 1));
        h.append(q(2.0, 2));

        assert_eq!(h.capacity(), 1);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().unwrap().current, 2.0);
    }

    proptest! {
        #[test]
        fn lag_present_iff_enough_quotes(
            capacity in 1usize..20,
            appended in 0usize..40,
            n in 0usize..25,
        ) {
            let mut h = QuoteHistory::new(capacity);
            for i in 0..appended {
                h.append(q(i as f64, i as i64));
            }

            let held = appended.min(capacity);
            prop_assert_eq!(h.len(), held);
            prop_assert_eq!(h.lag(n).is_some(), n >= 1 && held >= n + 1);

            if let Some(lagged) = h.lag(n) {
                // Quotes are numbered by insertion order.
                prop_assert_eq!(lagged.current, (appended - 1 - n) as f64);
            }
        }
    }
}
