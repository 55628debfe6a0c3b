//! The monitor controller and its polling loop.
//!
//! A single `Monitor` owns every collaborator: prober, clock, history store,
//! report writer, and the policy knobs. The loop wakes once per second and
//! works in tick (one-minute) units:
//!
//! - On a minute rollover, the previous minute's final pending sample is
//!   evaluated against the history (persist + render on accept) and a fresh
//!   sample is taken for the new minute.
//! - Within a minute, nothing happens while the pending sample is UP. While
//!   it is DOWN the loop re-probes every second and *replaces* the pending
//!   sample, so recovery is detected eagerly and a same-minute flap never
//!   reaches the transition engine at all.
//!
//! There is one thread and one suspension point (the probe itself); persist
//! always happens before render.

use std::time::Duration;

use crate::clock::Clock;
use crate::data::{History, HistoryStore, Observation, Outcome, Policy, StoreError};
use crate::probe::Prober;
use crate::report::ReportWriter;

/// How often the loop wakes to check for a tick rollover or re-probe.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the sampling loop and all of its collaborators.
pub struct Monitor {
    prober: Box<dyn Prober>,
    clock: Box<dyn Clock>,
    store: HistoryStore,
    report: ReportWriter,
    policy: Policy,
    history: History,
    /// The current minute's sample, not yet evaluated against history.
    pending: Option<Observation>,
}

impl Monitor {
    /// Load the persisted history and render the report once.
    ///
    /// A missing snapshot is a normal cold start; a corrupt one is returned
    /// as an error so the operator can intervene rather than losing history
    /// silently.
    pub fn start(
        prober: Box<dyn Prober>,
        clock: Box<dyn Clock>,
        store: HistoryStore,
        report: ReportWriter,
        policy: Policy,
    ) -> Result<Self, StoreError> {
        let history = store.load()?;
        if history.is_empty() {
            tracing::info!(prober = prober.description(), "Starting with empty history");
        } else {
            tracing::info!(
                prober = prober.description(),
                entries = history.len(),
                last_state = history.last().map(|o| o.state_label()).unwrap_or("?"),
                "Resuming from persisted history"
            );
        }

        let monitor = Self {
            prober,
            clock,
            store,
            report,
            policy,
            history,
            pending: None,
        };
        monitor.report.write(&monitor.history, &monitor.policy);
        Ok(monitor)
    }

    /// Run the polling loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
            self.clock.sleep(POLL_INTERVAL);
        }
    }

    /// One iteration of the polling loop.
    pub fn step(&mut self) {
        let now = self.clock.now_minute();
        match self.pending {
            // First iteration: just take the initial sample.
            None => {
                self.pending = Some(self.sample(now));
            }
            // Minute rolled over: evaluate the previous minute's final
            // sample, then sample the new minute.
            Some(prev) if prev.timestamp != now => {
                self.commit(prev);
                self.pending = Some(self.sample(now));
            }
            // Same minute and DOWN: re-probe eagerly so recovery is seen
            // within seconds rather than at the next tick.
            Some(prev) if !prev.online => {
                let fresh = self.sample(now);
                if fresh.online {
                    tracing::warn!(at = %now.format("%a %H:%M"), "Changed from DOWN to UP");
                }
                self.pending = Some(fresh);
            }
            // Same minute and UP: wait for the tick.
            Some(_) => {}
        }
    }

    /// Read access to the history, mainly for inspection in tests.
    pub fn history(&self) -> &History {
        &self.history
    }

    fn sample(&mut self, timestamp: chrono::DateTime<chrono::Local>) -> Observation {
        let online = self.prober.probe();
        let observation = Observation::new(timestamp, online);
        tracing::debug!(state = observation.state_label(), "Probe result");
        observation
    }

    /// Feed one observation through the transition engine; on accept,
    /// persist the snapshot and then re-render the report.
    fn commit(&mut self, observation: Observation) {
        if self.history.apply(observation, &self.policy) == Outcome::Accepted {
            if let Err(e) = self.store.save(&self.history) {
                // Keep monitoring; the next accepted sample retries the save.
                tracing::error!(error = %e, "Failed to persist history");
            }
            self.report.write(&self.history, &self.policy);
        }
    }
}
