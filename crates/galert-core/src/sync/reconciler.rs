//! Create-or-update reconciliation against the Grafana backend

use tracing::{error, info, warn};

use crate::error::Result;
use crate::grafana::GrafanaClient;
use crate::models::{AlertRule, RuleGroup};

/// Reconciles rule batches, folders, and group intervals.
///
/// Existence checks are fail-open: a failed lookup (404 included) is treated
/// as "does not exist" and logged as a warning, steering the reconciler
/// toward creation rather than propagating the error.
#[derive(Clone)]
pub struct RuleReconciler {
    grafana: GrafanaClient,
}

impl RuleReconciler {
    /// Create a reconciler backed by the given Grafana client.
    pub fn new(grafana: GrafanaClient) -> Self {
        Self { grafana }
    }

    // --- Alert rules ---

    /// Create the rule, or update it when the backend already has the UID.
    ///
    /// Idempotent: invoked twice with the same rule, the first call creates
    /// and the second converges to an update.
    pub async fn reconcile_rule(&self, rule: &AlertRule) -> Result<()> {
        if self.rule_exists(&rule.uid).await {
            self.grafana.update_alert_rule(&rule.uid, rule).await?;
            info!(rule_uid = %rule.uid, "Alert rule updated");
        } else {
            self.grafana.create_alert_rule(rule).await?;
            info!(rule_uid = %rule.uid, "Alert rule created");
        }
        Ok(())
    }

    /// Reconcile every rule in a batch in order.
    ///
    /// Per-rule failures are logged and do not block the remaining rules.
    pub async fn reconcile_rules(&self, rules: &[AlertRule]) {
        for rule in rules {
            if let Err(e) = self.reconcile_rule(rule).await {
                error!(rule_uid = %rule.uid, error = %e, "Failed to reconcile alert rule");
            }
        }
    }

    /// Delete every rule in the batch by UID, in order, with no existence
    /// check: deleting an absent rule is the backend's idempotent-delete
    /// responsibility. A failed delete is logged and the remaining
    /// deletions still run.
    pub async fn delete_rules(&self, rules: &[AlertRule]) {
        for rule in rules {
            match self.grafana.delete_alert_rule(&rule.uid).await {
                Ok(()) => info!(rule_uid = %rule.uid, "Alert rule deleted"),
                Err(e) => {
                    error!(rule_uid = %rule.uid, error = %e, "Failed to delete alert rule");
                }
            }
        }
    }

    async fn rule_exists(&self, uid: &str) -> bool {
        match self.grafana.get_alert_rule(uid).await {
            Ok(_) => true,
            Err(e) => {
                warn!(rule_uid = %uid, error = %e, "Alert rule lookup failed, assuming absent");
                false
            }
        }
    }

    // --- Folders ---

    /// Upsert the folder that owns a rule batch.
    ///
    /// The display title is derived from the UID via [`folder_title`]; an
    /// update keeps the UID so rules keep resolving their `folderUID`.
    pub async fn reconcile_folder(&self, folder_uid: &str) -> Result<()> {
        let title = folder_title(folder_uid);

        if self.folder_exists(folder_uid).await {
            self.grafana.update_folder(folder_uid, &title).await?;
            info!(folder_uid = %folder_uid, title = %title, "Folder updated");
        } else {
            self.grafana.create_folder(&title, folder_uid).await?;
            info!(folder_uid = %folder_uid, title = %title, "Folder created");
        }
        Ok(())
    }

    async fn folder_exists(&self, uid: &str) -> bool {
        match self.grafana.get_folder(uid).await {
            Ok(_) => true,
            Err(e) => {
                warn!(folder_uid = %uid, error = %e, "Folder lookup failed, assuming absent");
                false
            }
        }
    }

    // --- Rule groups ---

    /// Apply the evaluation interval for each rule group, in order.
    ///
    /// One failed group is logged and does not block the remaining groups.
    pub async fn apply_group_intervals(&self, folder_uid: &str, groups: &[RuleGroup]) {
        for group in groups {
            let interval = group.interval_or_default();
            match self
                .grafana
                .update_group_interval(folder_uid, &group.name, interval)
                .await
            {
                Ok(()) => {
                    info!(
                        folder_uid = %folder_uid,
                        group = %group.name,
                        interval,
                        "Rule group interval updated"
                    );
                }
                Err(e) => {
                    error!(
                        folder_uid = %folder_uid,
                        group = %group.name,
                        error = %e,
                        "Failed to update rule group interval"
                    );
                }
            }
        }
    }
}

/// Derive a folder's display title from its UID.
///
/// Separators (`-`, `_`) become spaces, each word is title-cased, the
/// literal word "Folder" is stripped, and surrounding whitespace is trimmed:
/// `ai-alerts` becomes `Ai Alerts`, `EMQX-FOLDER` becomes `Emqx`.
pub fn folder_title(folder_uid: &str) -> String {
    let titled = folder_uid
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    titled.replace("Folder", "").trim().to_string()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
