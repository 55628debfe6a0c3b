//! Randomized stub prober for environments without `arping`.

use super::Prober;

/// Development/testing stand-in that answers UP with low probability.
///
/// Mirrors the behavior of a mostly-unreachable host (roughly one UP per
/// fifty probes), which exercises the transition and flap paths without any
/// network access. Never use this for production monitoring.
#[derive(Debug)]
pub struct SimulatedProber {
    description: String,
    up_odds: u32,
}

impl SimulatedProber {
    pub fn new(target: impl AsRef<str>) -> Self {
        Self {
            description: format!("simulated: {}", target.as_ref()),
            up_odds: 50,
        }
    }
}

impl Prober for SimulatedProber {
    fn probe(&mut self) -> bool {
        fastrand::u32(..self.up_odds) == 0
    }

    fn description(&self) -> &str {
        &self.description
    }
}
