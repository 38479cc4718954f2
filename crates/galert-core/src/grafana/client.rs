//! HTTP client for the Grafana folder and alerting-provisioning APIs

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::AlertRule;

/// Request timeout for every Grafana call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A folder as returned by `GET /api/folders/{uid}`
#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    /// Folder UID
    pub uid: String,

    /// Display title
    pub title: String,
}

/// Client for the Grafana HTTP API.
///
/// Covers exactly the operations the controller provisions with: folder
/// get/create/update, alert-rule CRUD keyed by `uid`, and rule-group
/// interval updates keyed by `(folderUID, group)`. Every request carries the
/// configured bearer token; non-2xx responses map to [`Error::Api`] with the
/// response body text as the message.
#[derive(Clone)]
pub struct GrafanaClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GrafanaClient {
    /// Create a client against the configured Grafana instance.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: config.grafana_url.clone(),
            token: config.grafana_token.clone(),
        })
    }

    // --- Folders ---

    /// Fetch a folder by UID.
    pub async fn get_folder(&self, uid: &str) -> Result<Folder> {
        let response = self
            .request(Method::GET, &format!("/api/folders/{uid}"))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Create a folder with the given title and UID.
    pub async fn create_folder(&self, title: &str, uid: &str) -> Result<()> {
        let response = self
            .request(Method::POST, "/api/folders")
            .json(&FolderPayload {
                title,
                uid,
                overwrite: None,
            })
            .send()
            .await?;

        Self::check(response).await?;
        debug!(folder_uid = %uid, "Folder create request accepted");
        Ok(())
    }

    /// Update a folder's title, preserving its UID.
    pub async fn update_folder(&self, uid: &str, title: &str) -> Result<()> {
        let response = self
            .request(Method::PUT, &format!("/api/folders/{uid}"))
            .json(&FolderPayload {
                title,
                uid,
                overwrite: Some(true),
            })
            .send()
            .await?;

        Self::check(response).await?;
        debug!(folder_uid = %uid, "Folder update request accepted");
        Ok(())
    }

    // --- Alert rules ---

    /// Fetch a provisioned alert rule by UID.
    pub async fn get_alert_rule(&self, uid: &str) -> Result<serde_json::Value> {
        let response = self
            .request(Method::GET, &format!("/api/v1/provisioning/alert-rules/{uid}"))
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Create an alert rule, forwarding the rule object verbatim.
    pub async fn create_alert_rule(&self, rule: &AlertRule) -> Result<()> {
        let response = self
            .request(Method::POST, "/api/v1/provisioning/alert-rules")
            .json(rule)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(rule_uid = %rule.uid, "Alert rule create request accepted");
        Ok(())
    }

    /// Update the alert rule stored under `uid`.
    pub async fn update_alert_rule(&self, uid: &str, rule: &AlertRule) -> Result<()> {
        let response = self
            .request(Method::PUT, &format!("/api/v1/provisioning/alert-rules/{uid}"))
            .json(rule)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(rule_uid = %uid, "Alert rule update request accepted");
        Ok(())
    }

    /// Delete the alert rule stored under `uid`.
    pub async fn delete_alert_rule(&self, uid: &str) -> Result<()> {
        let response = self
            .request(
                Method::DELETE,
                &format!("/api/v1/provisioning/alert-rules/{uid}"),
            )
            .send()
            .await?;

        Self::check(response).await?;
        debug!(rule_uid = %uid, "Alert rule delete request accepted");
        Ok(())
    }

    // --- Rule groups ---

    /// Set the evaluation interval of a rule group within a folder.
    pub async fn update_group_interval(
        &self,
        folder_uid: &str,
        group: &str,
        interval_secs: u64,
    ) -> Result<()> {
        let response = self
            .request(
                Method::PUT,
                &format!("/api/v1/provisioning/folder/{folder_uid}/rule-groups/{group}"),
            )
            .json(&GroupIntervalPayload {
                interval: interval_secs,
            })
            .send()
            .await?;

        Self::check(response).await?;
        debug!(folder_uid = %folder_uid, group = %group, "Rule group interval request accepted");
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::api(status.as_u16(), message))
    }
}

/// Body for folder create and update requests
#[derive(Debug, Serialize)]
struct FolderPayload<'a> {
    title: &'a str,
    uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    overwrite: Option<bool>,
}

/// Body for rule-group interval updates
#[derive(Debug, Serialize)]
struct GroupIntervalPayload {
    interval: u64,
}
