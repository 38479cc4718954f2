//! # Galert
//!
//! Kubernetes controller that syncs Grafana alerting from `Galert` custom
//! resources.
//!
//! The controller watches cluster-scoped `Galert` resources and provisions
//! the alert rules, folders, and rule-group intervals they declare into
//! Grafana's alerting provisioning API. Deleting a resource removes its
//! rules from Grafana again.
//!
//! ## Architecture
//!
//! - **Models**: the `Galert` custom resource and the alert-rule payloads
//! - **Grafana**: thin HTTP client for the provisioning endpoints
//! - **Sync**: folder/rule/interval reconciliation plus startup healing
//! - **Watch**: the infinite watch loop over the custom resources
//!
//! ## Quick Start
//!
//! ```bash
//! export GRAFANA_URL=https://grafana.example.com
//! export GRAFANA_TOKEN=glsa_...
//! galert
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod grafana;
pub mod models;
pub mod sync;
pub mod watch;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::grafana::GrafanaClient;
    pub use crate::models::*;
    pub use crate::sync::{EventKind, EventProcessor, RuleReconciler, StartupReconciler};
    pub use crate::watch::WatchLoop;
}
