//! Dataproc REST client implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{ClusterDefinition, ErrorResponse, Operation};
use crate::cluster::ClusterSpec;
use crate::controller::traits::{
    Cluster, ClusterController, ClusterState, DataprocError, OperationHandle, RpcCode,
};

/// Default timeout for a single API request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default polling interval while waiting on an operation.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Dataproc cluster controller bound to one regional endpoint.
#[derive(Clone)]
pub struct Dataproc {
    /// HTTP client.
    client: Client,
    /// Base URL derived from the API endpoint.
    base_url: Url,
    /// `OAuth2` access token.
    access_token: String,
    /// Delay between operation polls.
    poll_interval: Duration,
}

impl Dataproc {
    /// Create a new Dataproc client.
    ///
    /// # Arguments
    /// * `api_endpoint` - `host:port` (addressed over HTTPS) or a full URL
    /// * `access_token` - `OAuth2` access token
    ///
    /// # Errors
    /// Returns error if the endpoint is not a valid base URL or the HTTP
    /// client cannot be created.
    pub fn new(api_endpoint: &str, access_token: impl Into<String>) -> Result<Self, DataprocError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Self::base_url(api_endpoint)?,
            access_token: access_token.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        })
    }

    /// Override the delay between operation polls.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Turn an API endpoint into a base URL.
    fn base_url(api_endpoint: &str) -> Result<Url, DataprocError> {
        let url = if api_endpoint.contains("://") {
            Url::parse(api_endpoint)?
        } else {
            Url::parse(&format!("https://{api_endpoint}"))?
        };

        if url.cannot_be_a_base() {
            return Err(DataprocError::Url(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(url)
    }

    /// URL of an operation resource. Empty and dot segments are refused.
    fn operation_url(&self, name: &str) -> Result<Url, DataprocError> {
        if name
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(DataprocError::MalformedOperation(format!(
                "invalid operation name: {name:?}"
            )));
        }
        Ok(self.url(std::iter::once("v1").chain(name.split('/'))))
    }

    /// Append path segments to the base URL.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, DataprocError> {
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post<T, B>(&self, url: Url, body: &B) -> Result<T, DataprocError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        debug!(url = %url, "POST request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DataprocError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                DataprocError::Serialization(e)
            })
        } else {
            Err(Self::classify_failure(status.as_u16(), text))
        }
    }

    /// Map a non-2xx response onto an error, preferring the body's own code.
    fn classify_failure(status: u16, text: String) -> DataprocError {
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(ErrorResponse { error }) => {
                let code = error
                    .status
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| RpcCode::from_http_status(error.code.unwrap_or(status)));
                let message = if error.message.is_empty() {
                    text
                } else {
                    error.message
                };
                DataprocError::from_status(code, message)
            }
            Err(_) => DataprocError::from_status(RpcCode::from_http_status(status), text),
        }
    }

    /// Resolve a finished operation into its outcome.
    fn resolve(op: Operation) -> Result<Cluster, DataprocError> {
        if let Some(status) = op.error {
            return Err(DataprocError::from_status(
                RpcCode::from_i32(status.code),
                status.message,
            ));
        }

        let cluster = op.response.ok_or_else(|| {
            DataprocError::MalformedOperation(format!(
                "operation {} is done without a response or an error",
                op.name
            ))
        })?;

        Ok(Cluster {
            project_id: cluster.project_id,
            cluster_name: cluster.cluster_name,
            cluster_uuid: cluster.cluster_uuid,
            state: cluster
                .status
                .map_or(ClusterState::Unknown, |status| status.state),
        })
    }
}

#[async_trait]
impl ClusterController for Dataproc {
    async fn submit_create(
        &self,
        project_id: &str,
        region: &str,
        spec: &ClusterSpec,
    ) -> Result<OperationHandle, DataprocError> {
        info!(
            project_id = %project_id,
            region = %region,
            cluster_name = %spec.cluster_name,
            "Creating Dataproc cluster"
        );

        let url = self.url(["v1", "projects", project_id, "regions", region, "clusters"]);
        let op: Operation = self.post(url, &ClusterDefinition::from(spec)).await?;

        info!(operation = %op.name, "Dataproc cluster creation initiated");
        Ok(OperationHandle::new(op.name))
    }

    async fn wait(&self, operation: OperationHandle) -> Result<Cluster, DataprocError> {
        info!(operation = %operation.name(), "Waiting for operation to finish");

        let url = self.operation_url(operation.name())?;
        let start = Instant::now();

        loop {
            let op: Operation = self.get(url.clone()).await?;

            if op.done {
                debug!(
                    operation = %op.name,
                    elapsed_secs = start.elapsed().as_secs(),
                    "Operation finished"
                );
                return Self::resolve(op);
            }

            let (state, description) = op
                .metadata
                .as_ref()
                .map(|m| {
                    (
                        m.status.as_ref().and_then(|s| s.state.clone()),
                        m.description.clone(),
                    )
                })
                .unwrap_or_default();
            debug!(
                operation = %op.name,
                state = state.as_deref().unwrap_or("UNKNOWN"),
                description = description.as_deref().unwrap_or(""),
                elapsed_secs = start.elapsed().as_secs(),
                "Polling operation status"
            );

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::regional_endpoint;

    #[test]
    fn test_base_url_from_regional_endpoint() {
        let url = Dataproc::base_url(&regional_endpoint("us-central1")).unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("us-central1-dataproc.googleapis.com"));
        assert_eq!(url.port_or_known_default(), Some(443));
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let url = Dataproc::base_url("http://127.0.0.1:8123").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8123));
    }

    #[test]
    fn test_url_segments() {
        let dataproc = Dataproc::new("http://localhost:8123/", "token").unwrap();
        let url = dataproc.url(["v1", "projects", "my project", "regions", "us-east1", "clusters"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8123/v1/projects/my%20project/regions/us-east1/clusters"
        );
    }

    #[test]
    fn test_base_url_rejects_invalid_endpoint() {
        assert!(matches!(
            Dataproc::base_url("us-central1-dataproc.googleapis.com:https"),
            Err(DataprocError::Url(_))
        ));
    }

    #[test]
    fn test_operation_url() {
        let dataproc = Dataproc::new("http://localhost:8123", "token").unwrap();
        let url = dataproc
            .operation_url("projects/p/regions/us-central1/operations/op-1")
            .unwrap();
        assert_eq!(url.path(), "/v1/projects/p/regions/us-central1/operations/op-1");
    }

    #[test]
    fn test_operation_url_rejects_dot_segments() {
        let dataproc = Dataproc::new("http://localhost:8123", "token").unwrap();
        for name in [
            "projects/../../x/operations/1",
            "projects/p/./operations/1",
            "projects//operations/1",
            "",
        ] {
            assert!(matches!(
                dataproc.operation_url(name),
                Err(DataprocError::MalformedOperation(_))
            ));
        }
    }

    #[test]
    fn test_classify_error_envelope() {
        let body = r#"{"error": {"code": 409, "message": "Already exists: Failed to create cluster", "status": "ALREADY_EXISTS"}}"#;
        let err = Dataproc::classify_failure(409, body.to_string());
        assert!(
            matches!(err, DataprocError::AlreadyExists(ref m) if m == "Already exists: Failed to create cluster")
        );
    }

    #[test]
    fn test_classify_plain_body() {
        let err = Dataproc::classify_failure(503, "upstream connect error".to_string());
        assert!(matches!(
            err,
            DataprocError::Api { code: RpcCode::Unavailable, ref message } if message == "upstream connect error"
        ));
    }

    #[test]
    fn test_resolve_done_without_outcome() {
        let op: Operation =
            serde_json::from_str(r#"{"name": "projects/p/regions/r/operations/1", "done": true}"#)
                .unwrap();
        assert!(matches!(
            Dataproc::resolve(op),
            Err(DataprocError::MalformedOperation(_))
        ));
    }
}
