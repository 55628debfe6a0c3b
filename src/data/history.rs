//! Ordered transition history and the rules for growing it.
//!
//! `History` only ever records *transitions*: no two consecutive entries share
//! the same `online` value. [`History::apply`] is the single mutation point
//! and decides, for each new observation, between three moves:
//!
//! - append it (a real state change, or the cold-start baseline),
//! - suppress it (the state did not change), or
//! - fold away a flap (a DOWN reversed by an UP within the configured window
//!   is treated as probe noise and the DOWN entry is removed).

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::observation::Observation;

/// Tunable policy for the transition engine and report bounding.
#[derive(Debug, Clone)]
pub struct Policy {
    /// A DOWN reversed by an UP within this window is folded away as noise.
    /// Samples are minute-aligned, so the default of one minute means the
    /// outage lasted a single sampling interval.
    pub flap_window: Duration,
    /// Number of entries shown by the tail report mode.
    pub tail_limit: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            flap_window: Duration::minutes(1),
            tail_limit: 20,
        }
    }
}

/// Result of evaluating one observation against the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The history changed; the caller must persist and re-render.
    Accepted,
    /// No change; nothing to persist or render.
    Suppressed,
}

/// Append-only sequence of state transitions, oldest first.
///
/// Serializes as a plain array of observations so the on-disk snapshot stays
/// a flat JSON list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Observation>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, i.e. the last known state.
    pub fn last(&self) -> Option<&Observation> {
        self.entries.last()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    /// Evaluate a new observation and mutate the history accordingly.
    ///
    /// Returns [`Outcome::Accepted`] whenever the history changed, which
    /// obliges the caller to persist the snapshot and re-render the report,
    /// in that order.
    pub fn apply(&mut self, new: Observation, policy: &Policy) -> Outcome {
        let Some(last) = self.entries.last().copied() else {
            // Cold start: the first observation establishes the baseline.
            tracing::info!(state = new.state_label(), "Baseline state recorded");
            self.entries.push(new);
            return Outcome::Accepted;
        };

        if new.online == last.online {
            return Outcome::Suppressed;
        }

        if new.online && !last.online && new.timestamp - last.timestamp <= policy.flap_window {
            // The DOWN lasted a single sampling interval: more likely transient
            // packet loss than a real outage, so undo it instead of recording
            // a DOWN/UP pair.
            self.entries.pop();
            tracing::info!(
                down_at = %last.timestamp.format("%a %H:%M"),
                "Folded away transient DOWN"
            );
            if self.entries.is_empty() {
                // Keep at least the latest observation so the report is never
                // blank.
                self.entries.push(new);
            }
            return Outcome::Accepted;
        }

        tracing::info!(
            from = last.state_label(),
            to = new.state_label(),
            at = %new.timestamp.format("%a %H:%M"),
            "State changed"
        );
        self.entries.push(new);
        debug_assert!(self.no_consecutive_duplicates());
        Outcome::Accepted
    }

    fn no_consecutive_duplicates(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].online != pair[1].online)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};

    fn minute(m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 4, 10, m, 0).unwrap()
    }

    fn obs(m: u32, online: bool) -> Observation {
        Observation::new(minute(m), online)
    }

    #[test]
    fn test_cold_start_establishes_baseline() {
        let mut history = History::new();
        let outcome = history.apply(obs(0, true), &Policy::default());
        assert_eq!(outcome, Outcome::Accepted);
        assert_eq!(history.entries(), &[obs(0, true)]);
    }

    #[test]
    fn test_repeated_state_is_suppressed() {
        let mut history = History::new();
        let policy = Policy::default();
        history.apply(obs(0, true), &policy);
        for m in 1..10 {
            assert_eq!(history.apply(obs(m, true), &policy), Outcome::Suppressed);
        }
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_transition_is_appended() {
        let mut history = History::new();
        let policy = Policy::default();
        history.apply(obs(0, true), &policy);
        assert_eq!(history.apply(obs(5, false), &policy), Outcome::Accepted);
        assert_eq!(history.entries(), &[obs(0, true), obs(5, false)]);
    }

    #[test]
    fn test_flap_is_folded_away() {
        let mut history = History::new();
        let policy = Policy::default();
        history.apply(obs(0, true), &policy);
        history.apply(obs(5, false), &policy);

        // UP exactly one minute after the DOWN: the DOWN is removed and no UP
        // entry is added.
        assert_eq!(history.apply(obs(6, true), &policy), Outcome::Accepted);
        assert_eq!(history.entries(), &[obs(0, true)]);
    }

    #[test]
    fn test_flap_on_sole_entry_keeps_the_up() {
        let mut history = History::new();
        let policy = Policy::default();
        history.apply(obs(5, false), &policy);

        // Folding the baseline DOWN would empty the history, so the UP is
        // kept as the sole entry.
        assert_eq!(history.apply(obs(6, true), &policy), Outcome::Accepted);
        assert_eq!(history.entries(), &[obs(6, true)]);
    }

    #[test]
    fn test_longer_outage_is_preserved() {
        let mut history = History::new();
        let policy = Policy::default();
        history.apply(obs(0, true), &policy);
        history.apply(obs(5, false), &policy);

        // Two minutes of DOWN is a real outage, not a flap.
        assert_eq!(history.apply(obs(7, true), &policy), Outcome::Accepted);
        assert_eq!(
            history.entries(),
            &[obs(0, true), obs(5, false), obs(7, true)]
        );
    }

    #[test]
    fn test_wider_flap_window() {
        let mut history = History::new();
        let policy = Policy {
            flap_window: Duration::minutes(3),
            ..Policy::default()
        };
        history.apply(obs(0, true), &policy);
        history.apply(obs(5, false), &policy);

        // Within the widened window the three-minute DOWN still folds away.
        history.apply(obs(8, true), &policy);
        assert_eq!(history.entries(), &[obs(0, true)]);
    }

    #[test]
    fn test_no_consecutive_duplicates_invariant() {
        let mut history = History::new();
        let policy = Policy::default();
        let states = [true, true, false, false, true, false, true, true, false];
        for (m, online) in states.into_iter().enumerate() {
            history.apply(obs(m as u32 * 2, online), &policy);
        }
        for pair in history.entries().windows(2) {
            assert_ne!(pair[0].online, pair[1].online);
        }
    }
}
