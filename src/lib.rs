//! # upwatch
//!
//! A host-availability monitor: once per minute it probes whether a target
//! address answers an ARP ping, records UP/DOWN *transitions* (never repeated
//! states) in a durable history, and renders that history as a
//! self-refreshing HTML or plain-text report.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Monitor (app)                     │
//! │                                                          │
//! │  clock ──tick──▶ probe ──Observation──▶ data::History    │
//! │  (1 min)        (arping)                    │            │
//! │                                      Accepted/Suppressed │
//! │                                             │            │
//! │                     ┌───────────────────────┤            │
//! │                     ▼                       ▼            │
//! │              data::HistoryStore        report::Writer    │
//! │              (<target>.json)           (report.html)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: the controller owning the one-second poll loop with
//!   per-minute tick semantics and eager re-probing while DOWN
//! - **[`clock`]**: injectable tick source ([`Clock`] trait), so tests can
//!   simulate time without sleeping
//! - **[`probe`]**: reachability checking behind the [`Prober`] trait, with
//!   an `arping`-backed implementation and a randomized dev stub
//! - **[`data`]**: the observation model, the transition engine with flap
//!   suppression, and atomic JSON snapshot persistence
//! - **[`report`]**: HTML/text rendering of the transition history
//!
//! ## Usage
//!
//! ```bash
//! # Monitor a host, tail-20 HTML report
//! upwatch 192.168.1.17
//!
//! # Full plain-text report, wider flap window
//! upwatch 192.168.1.17 -o report.txt --full-output --flap-window 2
//! ```

pub mod app;
pub mod clock;
pub mod data;
pub mod probe;
pub mod report;

pub use app::Monitor;
pub use clock::{Clock, SystemClock};
pub use data::{History, HistoryStore, Observation, Outcome, Policy, StoreError};
pub use probe::{ArpingProber, Prober, SimulatedProber};
pub use report::{ReportFormat, ReportMode, ReportWriter};
