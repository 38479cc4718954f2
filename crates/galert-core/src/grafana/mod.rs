//! Grafana API client
//!
//! The remote side of the reconciliation loop: folders, provisioned alert
//! rules, and rule-group evaluation intervals.

mod client;

pub use client::{Folder, GrafanaClient};
