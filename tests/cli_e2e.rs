//! End-to-end CLI tests for the pdfsquid binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn pdfsquid(endpoint: &str) -> Command {
    let mut cmd = Command::cargo_bin("pdfsquid").unwrap();
    cmd.env_remove("PDFSQUID_API_KEY")
        .env_remove("PDFSQUID_API_SECRET")
        .env_remove("PDFSQUID_ZONE")
        .env_remove("RUST_LOG")
        .args([
            "--api-key",
            "k",
            "--api-secret",
            "s",
            "--zone",
            "zone",
            "--endpoint",
            endpoint,
        ]);
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("pdfsquid").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("html-to-pdf"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("pdfsquid").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_binary_ping_unreachable_prints_false() {
    pdfsquid("http://127.0.0.1:1")
        .args(["-q", "ping"])
        .assert()
        .success()
        .stdout(predicate::str::diff("false\n"));
}

#[test]
fn test_binary_missing_credentials_fails() {
    let mut cmd = Command::cargo_bin("pdfsquid").unwrap();
    cmd.env_remove("PDFSQUID_API_KEY")
        .env_remove("PDFSQUID_API_SECRET")
        .env_remove("PDFSQUID_ZONE")
        .arg("ping")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--api-key"));
}

#[tokio::test]
async fn test_binary_get_file_saves_to_output_dir() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/getfile/job-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/pdf")
                .insert_header("Output-Format", "PDF")
                .insert_header("Conversion-Id", "job-1")
                .set_body_bytes(b"%PDF saved".to_vec()),
        )
        .mount(&server)
        .await;

    let output_dir = temp_dir.path().to_str().unwrap();
    pdfsquid(&server.uri())
        .args(["-q", "get-file", "job-1", "--output-dir", output_dir])
        .assert()
        .success()
        .stdout(predicate::str::contains("job-1.pdf"));

    let saved = std::fs::read(temp_dir.path().join("job-1.pdf")).unwrap();
    assert_eq!(saved, b"%PDF saved");
}

#[tokio::test]
async fn test_binary_api_error_exits_nonzero() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("POST"))
        .and(path("/v1/url/pdf/sync"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"bad url","error_code":7}"#),
        )
        .mount(&server)
        .await;

    pdfsquid(&server.uri())
        .args(["-q", "url-to-pdf", "not-a-page"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad url"));
}
