//! A single reachability sample.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One probe result: a minute-truncated timestamp plus the observed state.
///
/// Observations are immutable once created. The timestamp carries the local
/// timezone so reports read in wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// When the sample was taken, truncated to the minute.
    pub timestamp: DateTime<Local>,
    /// Whether the target answered the probe.
    pub online: bool,
}

impl Observation {
    pub fn new(timestamp: DateTime<Local>, online: bool) -> Self {
        Self { timestamp, online }
    }

    /// Returns the display label for the observed state.
    pub fn state_label(&self) -> &'static str {
        if self.online {
            "UP"
        } else {
            "DOWN"
        }
    }
}

impl fmt::Display for Observation {
    /// Formats as a report line, e.g. `Mon 14:03 UP`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.timestamp.format("%a %H:%M"),
            self.state_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_format() {
        // 2024-01-01 was a Monday
        let ts = Local.with_ymd_and_hms(2024, 1, 1, 14, 3, 0).unwrap();
        assert_eq!(Observation::new(ts, true).to_string(), "Mon 14:03 UP");
        assert_eq!(Observation::new(ts, false).to_string(), "Mon 14:03 DOWN");
    }

    #[test]
    fn test_serde_round_trip() {
        let ts = Local.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap();
        let obs = Observation::new(ts, false);
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, back);
    }
}
