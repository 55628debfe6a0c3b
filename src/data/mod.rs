//! Data models, the transition engine, and snapshot persistence.
//!
//! ## Data flow
//!
//! ```text
//! Prober sample
//!      │
//!      ▼
//! Observation ──▶ History::apply() ──▶ Accepted ──▶ HistoryStore::save()
//!                        │                                │
//!                        └──▶ Suppressed (no-op)          └──▶ report render
//! ```
//!
//! - [`observation`]: a single (timestamp, online) sample
//! - [`history`]: the ordered transition log and the accept/suppress/flap rules
//! - [`store`]: durable JSON snapshots, one file per target

pub mod history;
pub mod observation;
pub mod store;

pub use history::{History, Outcome, Policy};
pub use observation::Observation;
pub use store::{HistoryStore, StoreError};
