//! Alert rule and rule group data models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Fallback evaluation interval in seconds for rule groups
pub const DEFAULT_GROUP_INTERVAL: u64 = 60;

/// One Grafana alert rule carried by a `Galert` resource.
///
/// Only `uid` and `folderUID` are interpreted by the controller; every other
/// field (condition, data queries, labels) is forwarded to Grafana verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    /// Stable identifier, unique within the Grafana backend
    pub uid: String,

    /// UID of the folder that owns this rule
    #[serde(rename = "folderUID")]
    pub folder_uid: String,

    /// Backend-specific rule fields, passed through untouched
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl AlertRule {
    /// Decode the JSON-encoded rule list carried by a resource's `rules`
    /// field.
    ///
    /// Every rule must carry `uid` and `folderUID`; a single malformed rule
    /// fails the whole batch (decode errors are batch-scoped).
    pub fn parse_batch(rules: &str) -> Result<Vec<AlertRule>> {
        Ok(serde_json::from_str(rules)?)
    }
}

/// Evaluation interval settings for a named rule group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Rule-group identifier, scoped to a folder
    pub name: String,

    /// Evaluation interval in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
}

impl RuleGroup {
    /// Effective evaluation interval; absent or zero values fall back to
    /// [`DEFAULT_GROUP_INTERVAL`].
    pub fn interval_or_default(&self) -> u64 {
        match self.interval {
            Some(secs) if secs != 0 => secs,
            _ => DEFAULT_GROUP_INTERVAL,
        }
    }
}
