//! Shared types used by the scheduler subsystem.

use std::time::Duration;

use market::TrackerError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("invalid interval '{0}': expected \"<n> seconds|minutes|hours\" with n > 0")]
    InvalidInterval(String),

    #[error("tracker refers to unknown feed '{0}'")]
    UnknownFeed(String),

    #[error("tracker setup failed: {0}")]
    Tracker(#[from] TrackerError),
}

/// Parse a human interval such as `"30 seconds"`, `"5 minutes"` or `"1 hour"`.
///
/// Units may be singular or plural and are case-insensitive.
pub fn parse_interval(s: &str) -> Result<Duration, ScheduleError> {
    let invalid = || ScheduleError::InvalidInterval(s.to_string());

    let mut parts = s.split_whitespace();
    let (Some(n), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let n: u64 = n.parse().map_err(|_| invalid())?;
    if n == 0 {
        return Err(invalid());
    }

    let unit_secs = match unit.to_ascii_lowercase().as_str() {
        "second" | "seconds" => 1,
        "minute" | "minutes" => 60,
        "hour" | "hours" => 3_600,
        _ => return Err(invalid()),
    };

    n.checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse_interval("30 seconds").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_interval("5 minutes").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_interval("1 hour").unwrap(), Duration::from_secs(3_600));
        assert_eq!(parse_interval("  2   Hours ").unwrap(), Duration::from_secs(7_200));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "30", "seconds", "0 seconds", "-1 minutes", "3 days", "1 minute later"] {
            assert_eq!(
                parse_interval(bad),
                Err(ScheduleError::InvalidInterval(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn overflow_is_invalid() {
        assert!(parse_interval(&format!("{} hours", u64::MAX)).is_err());
    }
}
