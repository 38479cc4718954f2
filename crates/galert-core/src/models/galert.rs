//! The `Galert` custom resource

use std::borrow::Cow;

use k8s_openapi::ClusterResourceScope;
use kube::api::ObjectMeta;
use kube::Resource;
use serde::{Deserialize, Serialize};

use super::rule::RuleGroup;

/// A cluster operator's declared alerting configuration.
///
/// `rules` and `ruleGroups` live at the top level of the object, as siblings
/// of `metadata` rather than under a `spec` block, so the [`kube::Resource`]
/// impl is written by hand instead of using the `CustomResource` derive.
///
/// Invariant: every rule in the decoded `rules` list belongs to the folder
/// named by the first rule's `folderUID`; the controller applies that UID to
/// the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrafanaAlert {
    /// Standard object metadata
    pub metadata: ObjectMeta,

    /// JSON-encoded array of alert rules, each carrying at least `uid` and
    /// `folderUID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,

    /// Optional per-group evaluation interval settings
    #[serde(
        default,
        rename = "ruleGroups",
        skip_serializing_if = "Option::is_none"
    )]
    pub rule_groups: Option<Vec<RuleGroup>>,
}

impl Resource for GrafanaAlert {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("Galert")
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("grafana.abarrak.com")
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("v1alpha1")
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("galerts")
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decodes_top_level_fields() {
        let object = json!({
            "apiVersion": "grafana.abarrak.com/v1alpha1",
            "kind": "Galert",
            "metadata": { "name": "demo", "resourceVersion": "42" },
            "rules": "[{\"uid\": \"A\", \"folderUID\": \"f1\"}]",
            "ruleGroups": [{ "name": "VM-2m", "interval": 120 }]
        });

        let resource: GrafanaAlert = serde_json::from_value(object).unwrap();

        assert_eq!(resource.metadata.name.as_deref(), Some("demo"));
        assert_eq!(
            resource.rules.as_deref(),
            Some("[{\"uid\": \"A\", \"folderUID\": \"f1\"}]")
        );
        assert_eq!(
            resource.rule_groups,
            Some(vec![RuleGroup {
                name: "VM-2m".to_string(),
                interval: Some(120),
            }])
        );
    }

    #[test]
    fn test_rules_and_groups_are_optional() {
        let object = json!({
            "apiVersion": "grafana.abarrak.com/v1alpha1",
            "kind": "Galert",
            "metadata": { "name": "empty" }
        });

        let resource: GrafanaAlert = serde_json::from_value(object).unwrap();

        assert_eq!(resource.rules, None);
        assert_eq!(resource.rule_groups, None);
    }

    #[test]
    fn test_resource_impl_targets_cluster_scoped_galerts() {
        assert_eq!(GrafanaAlert::kind(&()), "Galert");
        assert_eq!(GrafanaAlert::group(&()), "grafana.abarrak.com");
        assert_eq!(GrafanaAlert::version(&()), "v1alpha1");
        assert_eq!(GrafanaAlert::plural(&()), "galerts");
        assert_eq!(
            GrafanaAlert::url_path(&(), None),
            "/apis/grafana.abarrak.com/v1alpha1/galerts"
        );
    }
}
