//! Sync module - reconciles declared alerting state into Grafana
//!
//! The event processor interprets watch events, the rule reconciler performs
//! the folder/rule/interval upserts, and the startup reconciler heals drift
//! once at boot.

mod processor;
mod reconciler;
mod startup;

pub use processor::{EventKind, EventProcessor};
pub use reconciler::{folder_title, RuleReconciler};
pub use startup::StartupReconciler;
