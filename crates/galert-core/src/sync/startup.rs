//! One-shot reconciliation of pre-existing resources at process start

use kube::api::ListParams;
use kube::{Api, ResourceExt};
use tracing::{error, info};

use crate::error::Result;
use crate::grafana::GrafanaClient;
use crate::models::{AlertRule, GrafanaAlert};

use super::reconciler::RuleReconciler;

/// Heals drift accumulated while the controller was offline.
///
/// Lists every existing resource once and update-or-creates its rules.
/// This path never deletes anything and does not touch folders or group
/// intervals; the watch loop owns those per-event.
pub struct StartupReconciler {
    api: Api<GrafanaAlert>,
    reconciler: RuleReconciler,
}

impl StartupReconciler {
    /// Create a startup reconciler over all cluster resources.
    pub fn new(client: kube::Client, grafana: GrafanaClient) -> Self {
        Self {
            api: Api::all(client),
            reconciler: RuleReconciler::new(grafana),
        }
    }

    /// List all resources and reconcile each one's rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the list call itself fails. Failures scoped to a
    /// single resource are logged and skipped.
    pub async fn run(&self) -> Result<()> {
        let resources = self.api.list(&ListParams::default()).await?;
        info!(count = resources.items.len(), "Reconciling existing resources");

        for resource in &resources.items {
            self.reconcile_resource(resource).await;
        }
        Ok(())
    }

    async fn reconcile_resource(&self, resource: &GrafanaAlert) {
        let name = resource.name_any();
        let Some(raw) = resource.rules.as_deref() else {
            info!(resource = %name, "Resource carries no rules, skipping");
            return;
        };

        let rules = match AlertRule::parse_batch(raw) {
            Ok(rules) => rules,
            Err(e) => {
                error!(resource = %name, error = %e, "Failed to decode alert rules, skipping resource");
                return;
            }
        };

        info!(resource = %name, count = rules.len(), "Reconciling alert rules");
        self.reconciler.reconcile_rules(&rules).await;
    }
}
