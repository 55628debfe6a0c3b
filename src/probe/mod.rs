//! Reachability probing.
//!
//! The loop only needs a yes/no answer per sample, so the prober is a narrow
//! trait with two implementations: [`ArpingProber`] shells out to the system
//! `arping` utility, and [`SimulatedProber`] is a randomized stand-in for
//! environments where `arping` is unavailable (testing/development only).

mod arping;
mod sim;

pub use arping::ArpingProber;
pub use sim::SimulatedProber;

use std::fmt::Debug;

/// A black-box reachability check for a single target.
///
/// Implementations must collapse every failure mode (timeout, no route,
/// missing utility) to `false`; the caller never sees probe errors.
pub trait Prober: Debug {
    /// Probe the target once. May block up to the implementation's timeout.
    fn probe(&mut self) -> bool;

    /// Human-readable description of the prober, for logs.
    fn description(&self) -> &str;
}
