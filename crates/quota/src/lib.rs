//! Per-client daily command quota for IntentGate.
//!
//! Each client identity gets a budget of N commands per calendar day. Usage
//! lives in process memory only: a restart or a new day starts from zero.

pub mod tracker;

pub use tracker::{QuotaTracker, UsageInfo};
