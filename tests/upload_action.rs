//! Upload action behaviour against a mock HTTP endpoint.

use std::path::PathBuf;

use lapse::actions::{Action, UploadAction};
use lapse::config::UploadConfig;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_artifact(dir: &tempfile::TempDir) -> PathBuf {
    let day = dir.path().join("2026-08-05");
    std::fs::create_dir_all(&day).unwrap();
    let artifact = day.join("10:00:00.jpg");
    std::fs::write(&artifact, b"jpeg-bytes").unwrap();
    artifact
}

fn upload_config(base_url: String) -> UploadConfig {
    UploadConfig {
        base_url,
        sas_token: String::new(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn uploads_artifact_bytes_as_a_block_blob() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/2026-08-05/10:00:00.jpg"))
        .and(header("x-ms-blob-type", "BlockBlob"))
        .and(body_bytes(b"jpeg-bytes".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(&dir);
    let action = UploadAction::new(upload_config(server.uri()));

    let outcome = tokio::task::spawn_blocking(move || action.run(&artifact))
        .await
        .unwrap();
    assert!(outcome.success, "detail: {:?}", outcome.detail);
}

#[tokio::test]
async fn rejected_upload_is_a_failure_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(&dir);
    let action = UploadAction::new(upload_config(server.uri()));

    let outcome = tokio::task::spawn_blocking(move || action.run(&artifact))
        .await
        .unwrap();
    assert!(!outcome.success);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failure_outcome_not_a_panic() {
    // Nothing listens on the discard port; connecting fails immediately.
    let dir = tempfile::tempdir().unwrap();
    let artifact = write_artifact(&dir);
    let action = UploadAction::new(upload_config("http://127.0.0.1:9".to_owned()));

    let outcome = tokio::task::spawn_blocking(move || action.run(&artifact))
        .await
        .unwrap();
    assert!(!outcome.success);
}
