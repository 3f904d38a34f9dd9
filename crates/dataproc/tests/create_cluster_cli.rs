//! `create-cluster` binary exit behavior.

use std::process::Output;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLUSTERS_PATH: &str = "/v1/projects/my-project/regions/us-central1/clusters";
const OPERATION_NAME: &str = "projects/my-project/regions/us-central1/operations/op-9";
const OPERATION_PATH: &str = "/v1/projects/my-project/regions/us-central1/operations/op-9";

async fn create_cluster(args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_create-cluster"))
        .args(args)
        .env_remove("DATAPROC_API_ENDPOINT")
        .env_remove("GOOGLE_OAUTH_ACCESS_TOKEN")
        .env_remove("DATAPROC_POLL_INTERVAL")
        // Any attempt to reach gcloud fails with an auth error instead of a usage error.
        .env("PATH", "")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_missing_arguments_exit_with_usage() {
    let output = create_cluster(&["my-project", "us-central1"]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CLUSTER_NAME"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_success_prints_cluster_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CLUSTERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": OPERATION_NAME })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OPERATION_NAME,
            "done": true,
            "response": {
                "projectId": "my-project",
                "clusterName": "test-cluster",
                "status": { "state": "RUNNING" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = create_cluster(&[
        "my-project",
        "us-central1",
        "test-cluster",
        "--api-endpoint",
        &uri,
        "--access-token",
        "test-token",
    ])
    .await;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Cluster created successfully: test-cluster\n"
    );
}

#[tokio::test]
async fn test_conflict_exits_non_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CLUSTERS_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {
                "code": 409,
                "message": "Already exists: Failed to create cluster",
                "status": "ALREADY_EXISTS"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = create_cluster(&[
        "my-project",
        "us-central1",
        "test-cluster",
        "--api-endpoint",
        &uri,
        "--access-token",
        "test-token",
    ])
    .await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Already exists: Failed to create cluster"),
        "stderr: {stderr}"
    );
}
