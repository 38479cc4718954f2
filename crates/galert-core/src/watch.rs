//! Watch loop over Galert custom resources
//!
//! Consumes the Kubernetes watch stream one event at a time and hands each
//! Added/Modified/Deleted event to the [`EventProcessor`]. The loop owns the
//! `resourceVersion` cursor: a graceful end of a watch response re-watches
//! from the last seen version, while stream errors propagate to the entry
//! point so the platform can restart the process.

use futures::{StreamExt, TryStreamExt};
use kube::api::{WatchEvent, WatchParams};
use kube::Api;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::models::GrafanaAlert;
use crate::sync::{EventKind, EventProcessor};

/// Infinite watch over all Galert resources in the cluster.
pub struct WatchLoop {
    api: Api<GrafanaAlert>,
    processor: EventProcessor,
}

impl WatchLoop {
    /// Create a watch loop over all cluster resources.
    pub fn new(client: kube::Client, processor: EventProcessor) -> Self {
        Self {
            api: Api::all(client),
            processor,
        }
    }

    /// Consume the watch stream until a stream error occurs.
    ///
    /// # Errors
    ///
    /// Returns an error when the watch request fails or the stream delivers
    /// an error item. The loop does not restart itself after errors.
    pub async fn run(&self) -> Result<()> {
        // Version "0" replays every existing resource as a synthetic ADDED
        // event before live changes start flowing.
        let mut version = String::from("0");

        loop {
            debug!(resource_version = %version, "Starting watch");
            let mut stream = self
                .api
                .watch(&WatchParams::default(), &version)
                .await?
                .boxed();

            while let Some(event) = stream.try_next().await? {
                match event {
                    WatchEvent::Added(resource) => {
                        self.handle(&mut version, EventKind::Added, &resource).await;
                    }
                    WatchEvent::Modified(resource) => {
                        self.handle(&mut version, EventKind::Modified, &resource).await;
                    }
                    WatchEvent::Deleted(resource) => {
                        self.handle(&mut version, EventKind::Deleted, &resource).await;
                    }
                    WatchEvent::Bookmark(bookmark) => {
                        version.clone_from(&bookmark.metadata.resource_version);
                    }
                    WatchEvent::Error(err) => {
                        error!(code = err.code, message = %err.message, "Watch stream delivered an error");
                        return Err(Error::Kube(kube::Error::Api(err)));
                    }
                }
            }

            // Graceful end of the response body; resume from the cursor.
            debug!(resource_version = %version, "Watch ended, re-watching");
        }
    }

    async fn handle(&self, version: &mut String, kind: EventKind, resource: &GrafanaAlert) {
        if let Some(rv) = &resource.metadata.resource_version {
            version.clone_from(rv);
        }
        self.processor.process(kind, resource).await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Config;
    use crate::grafana::GrafanaClient;

    use super::*;

    const GALERTS_PATH: &str = "/apis/grafana.abarrak.com/v1alpha1/galerts";

    fn kube_client(server: &MockServer) -> kube::Client {
        let config = kube::Config::new(server.uri().parse::<http::Uri>().unwrap());
        kube::Client::try_from(config).unwrap()
    }

    fn processor(server: &MockServer) -> EventProcessor {
        let config = Config::new(server.uri(), "token").unwrap();
        EventProcessor::new(GrafanaClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_added_event_flows_through_to_grafana() {
        let kube = MockServer::start().await;
        let grafana = MockServer::start().await;

        let event = json!({
            "type": "ADDED",
            "object": {
                "apiVersion": "grafana.abarrak.com/v1alpha1",
                "kind": "Galert",
                "metadata": {"name": "demo", "resourceVersion": "7"},
                "rules": "[{\"uid\": \"W1\", \"folderUID\": \"ai-alerts\"}]",
            },
        });
        Mock::given(method("GET"))
            .and(path(GALERTS_PATH))
            .and(query_param("watch", "true"))
            .and(query_param("resourceVersion", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(format!("{event}\n"), "application/json"),
            )
            .up_to_n_times(1)
            .mount(&kube)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/folders/ai-alerts"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&grafana)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/folders"))
            .and(body_json(json!({"title": "Ai Alerts", "uid": "ai-alerts"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&grafana)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/provisioning/alert-rules/W1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&grafana)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/provisioning/alert-rules"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&grafana)
            .await;

        // The re-watch request is unmocked; its failure ends the loop.
        let watcher = WatchLoop::new(kube_client(&kube), processor(&grafana));
        assert!(watcher.run().await.is_err());
    }

    #[tokio::test]
    async fn test_bookmark_advances_the_resume_cursor() {
        let kube = MockServer::start().await;
        let grafana = MockServer::start().await;

        let bookmark = json!({
            "type": "BOOKMARK",
            "object": {
                "apiVersion": "grafana.abarrak.com/v1alpha1",
                "kind": "Galert",
                "metadata": {"resourceVersion": "42"},
            },
        });
        Mock::given(method("GET"))
            .and(path(GALERTS_PATH))
            .and(query_param("resourceVersion", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(format!("{bookmark}\n"), "application/json"),
            )
            .expect(1)
            .mount(&kube)
            .await;
        Mock::given(method("GET"))
            .and(path(GALERTS_PATH))
            .and(query_param("resourceVersion", "42"))
            .respond_with(ResponseTemplate::new(410))
            .expect(1)
            .mount(&kube)
            .await;

        let watcher = WatchLoop::new(kube_client(&kube), processor(&grafana));
        assert!(watcher.run().await.is_err());

        // Bookmarks only move the cursor; nothing reaches Grafana.
        assert!(grafana.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_item_is_fatal() {
        let kube = MockServer::start().await;
        let grafana = MockServer::start().await;

        let error_event = json!({
            "type": "ERROR",
            "object": {
                "kind": "Status",
                "apiVersion": "v1",
                "metadata": {},
                "status": "Failure",
                "message": "too old resource version: 1 (5)",
                "reason": "Expired",
                "code": 410,
            },
        });
        Mock::given(method("GET"))
            .and(path(GALERTS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(format!("{error_event}\n"), "application/json"),
            )
            .expect(1)
            .mount(&kube)
            .await;

        let watcher = WatchLoop::new(kube_client(&kube), processor(&grafana));
        let err = watcher.run().await.unwrap_err();
        assert!(matches!(err, Error::Kube(kube::Error::Api(e)) if e.code == 410));
        assert!(grafana.received_requests().await.unwrap().is_empty());
    }
}
