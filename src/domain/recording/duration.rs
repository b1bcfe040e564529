//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording duration (5 minutes)
pub const DEFAULT_DURATION_SECS: u64 = 300;

/// Default bound for a single probe (10 seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds, saturating at `u64::MAX` milliseconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs.saturating_mul(1000),
        }
    }

    /// Default recording duration
    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    /// Default probe timeout
    pub const fn default_probe_timeout() -> Self {
        Self::from_secs(DEFAULT_PROBE_TIMEOUT_SECS)
    }

    /// Get duration in whole seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Add whole seconds, saturating
    pub const fn saturating_add_secs(&self, secs: u64) -> Self {
        Self {
            milliseconds: self.milliseconds.saturating_add(secs.saturating_mul(1000)),
        }
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "30s", "5m", "2m30s", "1h", "1h30m"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        let mut hours: Option<u64> = None;
        let mut minutes: Option<u64> = None;
        let mut seconds: Option<u64> = None;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
                continue;
            }
            if current_num.is_empty() {
                return Err(err());
            }
            let value: u64 = current_num.parse().map_err(|_| err())?;
            let slot = match ch {
                'h' => &mut hours,
                'm' => &mut minutes,
                's' => &mut seconds,
                _ => return Err(err()),
            };
            // Each unit may appear once
            if slot.replace(value).is_some() {
                return Err(err());
            }
            current_num.clear();
            found_any = true;
        }

        // Leftover digits without a unit are ambiguous
        if !current_num.is_empty() || !found_any {
            return Err(err());
        }

        let (hours, minutes, seconds) = (
            hours.unwrap_or(0),
            minutes.unwrap_or(0),
            seconds.unwrap_or(0),
        );
        let total_secs = hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(seconds))
            .ok_or_else(err)?;

        if total_secs == 0 {
            return Err(err());
        }

        let milliseconds = total_secs.checked_mul(1000).ok_or_else(err)?;
        Ok(Self::from_millis(milliseconds))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            write!(f, "{}h", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}m", minutes)?;
        }
        if seconds > 0 || total_secs == 0 {
            write!(f, "{}s", seconds)?;
        }
        Ok(())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_std(), StdDuration::from_secs(30));
    }

    #[test]
    fn parse_minutes_only() {
        let d: Duration = "5m".parse().unwrap();
        assert_eq!(d.as_secs(), 300);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_hours_and_minutes() {
        let d: Duration = "1h30m".parse().unwrap();
        assert_eq!(d.as_secs(), 5400);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        let d: Duration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("300".parse::<Duration>().is_err());
        assert!("5x".parse::<Duration>().is_err());
        assert!("m5".parse::<Duration>().is_err());
    }

    #[test]
    fn parse_rejects_values_too_large_to_represent() {
        assert!("18446744073709552s".parse::<Duration>().is_err());
        assert!("99999999999999999999s".parse::<Duration>().is_err());
        assert!("5124095576030431h".parse::<Duration>().is_err());
        let max_secs = u64::MAX / 1000;
        let d: Duration = format!("{}s", max_secs).parse().unwrap();
        assert_eq!(d.as_secs(), max_secs);
    }

    #[test]
    fn parse_rejects_repeated_unit() {
        assert!("5m5m".parse::<Duration>().is_err());
        assert!("1h30s10s".parse::<Duration>().is_err());
        assert!("1h5m30s".parse::<Duration>().is_ok());
    }

    #[test]
    fn from_secs_saturates() {
        assert_eq!(Duration::from_secs(u64::MAX).as_std(), StdDuration::from_millis(u64::MAX));
    }

    #[test]
    fn display_round_numbers() {
        assert_eq!(Duration::from_secs(30).to_string(), "30s");
        assert_eq!(Duration::from_secs(300).to_string(), "5m");
        assert_eq!(Duration::from_secs(3600).to_string(), "1h");
        assert_eq!(Duration::from_secs(3690).to_string(), "1h1m30s");
    }

    #[test]
    fn recording_bound_adds_grace() {
        let d = Duration::from_secs(300).saturating_add_secs(60);
        assert_eq!(d.as_std(), StdDuration::from_secs(360));
    }

    #[test]
    fn default_values() {
        assert_eq!(Duration::default_duration().as_secs(), 300);
        assert_eq!(Duration::default_probe_timeout().as_secs(), 10);
    }
}
