//! Per-event processing for the Galert watch stream

use std::fmt;

use kube::ResourceExt;
use tracing::{error, info};

use crate::grafana::GrafanaClient;
use crate::models::{AlertRule, GrafanaAlert};

use super::reconciler::RuleReconciler;

/// The event kinds delivered by the resource event source.
///
/// A closed set: bookmark and error stream items are consumed by the watch
/// loop and never reach the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Resource was created (or replayed on watch start)
    Added,
    /// Resource was changed
    Modified,
    /// Resource was removed
    Deleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            EventKind::Added => "ADDED",
            EventKind::Modified => "MODIFIED",
            EventKind::Deleted => "DELETED",
        };
        f.write_str(kind)
    }
}

/// Interprets one watch event and drives the reconciler.
///
/// For every event regardless of kind, the owning folder (taken from the
/// first rule's `folderUID`) and the rule-group intervals are upserted
/// first; the rule batch is then created/updated or deleted depending on
/// the kind. All failures are handled here: decode errors abandon the event,
/// remote-call errors are logged and the remaining steps continue.
pub struct EventProcessor {
    reconciler: RuleReconciler,
}

impl EventProcessor {
    /// Create a processor backed by the given Grafana client.
    pub fn new(grafana: GrafanaClient) -> Self {
        Self {
            reconciler: RuleReconciler::new(grafana),
        }
    }

    /// Handle one watch event end to end.
    pub async fn process(&self, kind: EventKind, resource: &GrafanaAlert) {
        let name = resource.name_any();
        info!(resource = %name, kind = %kind, "Processing event");

        let Some(raw) = resource.rules.as_deref() else {
            info!(resource = %name, "Resource carries no rules, nothing to do");
            return;
        };

        // Decoded once per event; a failure abandons folder, intervals, and
        // rules alike, with zero remote calls.
        let rules = match AlertRule::parse_batch(raw) {
            Ok(rules) => rules,
            Err(e) => {
                error!(resource = %name, error = %e, "Failed to decode alert rules, abandoning event");
                return;
            }
        };

        let Some(first) = rules.first() else {
            info!(resource = %name, "Rule list is empty, nothing to do");
            return;
        };
        let folder_uid = first.folder_uid.clone();

        if let Err(e) = self.reconciler.reconcile_folder(&folder_uid).await {
            error!(folder_uid = %folder_uid, error = %e, "Folder upsert failed, continuing with rules");
        }

        match resource.rule_groups.as_deref() {
            Some(groups) if !groups.is_empty() => {
                self.reconciler.apply_group_intervals(&folder_uid, groups).await;
            }
            _ => info!(resource = %name, "No rule group settings assigned"),
        }

        match kind {
            EventKind::Added | EventKind::Modified => {
                info!(resource = %name, count = rules.len(), "Reconciling alert rules");
                self.reconciler.reconcile_rules(&rules).await;
            }
            EventKind::Deleted => {
                info!(resource = %name, count = rules.len(), "Deleting alert rules");
                self.reconciler.delete_rules(&rules).await;
            }
        }
    }
}
