//! Integration tests for the `awsquiz generate` subcommand
//!
//! Runs the built binary with a temporary config file and checks the JSON it
//! prints on stdout and its exit status.

use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_QUIZ: &str = r#"{"question":"Q","options":["A","B","C","D"],"answer":"A"}"#;

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

async fn run_generate(config_path: &Path, openai_key: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_awsquiz"));
    command
        .arg("--config")
        .arg(config_path)
        .arg("generate")
        .env_remove("OPENAI_API_KEY")
        .env_remove("GEMINI_API_KEY");

    if let Some(key) = openai_key {
        command.env("OPENAI_API_KEY", key);
    }

    command.output().await.expect("Failed to run awsquiz")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[tokio::test]
async fn test_generate_without_keys_prints_error_and_exits_1() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("missing.toml");

    let output = run_generate(&config_path, None).await;

    assert_eq!(output.status.code(), Some(1));
    let body = stdout_json(&output);
    assert_eq!(
        body["error"],
        "Missing API keys: set OPENAI_API_KEY and/or GEMINI_API_KEY"
    );
}

#[tokio::test]
async fn test_generate_prints_quiz_and_exits_0() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": VALID_QUIZ}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[providers.openai]\nbase_url = \"{}/v1\"\ntimeout_seconds = 5\n",
            server.uri()
        ),
    )
    .expect("Failed to write config");

    let output = run_generate(&config_path, Some("sk-test")).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let body = stdout_json(&output);
    assert_eq!(body["source"], "openai");
    assert_eq!(body["quiz"]["answer"], "A");
    assert_eq!(body["content"], VALID_QUIZ);
}

#[tokio::test]
async fn test_generate_rejects_invalid_config_file() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[providers.gemini]\nbase_url = \"ftp://nope\"\n")
        .expect("Failed to write config");

    let output = run_generate(&config_path, Some("sk-test")).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("providers.gemini.base_url"));
}
