use assert_cmd::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with configuration isolated in `dir`
#[allow(deprecated)]
fn studio(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("predict-studio").unwrap();
    cmd.env("PREDICT_STUDIO_CONFIG", dir.join("config.toml"))
        .env_remove("PREDICT_STUDIO_PROFILE")
        .env_remove("PREDICT_STUDIO_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("predict-studio"));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_run_help_describes_csv_input() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset to upload (CSV)"))
        .stdout(predicate::str::contains("Excel").not());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["config", "set", "settings.download_dir", "/tmp/studio-out"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    studio(dir.path())
        .args(["config", "get", "settings.download_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/studio-out"));
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["config", "get", "settings.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn test_configured_output_format_applies_to_show() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["config", "set", "settings.output_format", "json"])
        .assert()
        .success();

    let output = studio(dir.path()).args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["output_format"], "json");
    assert_eq!(view["api_url"], "http://127.0.0.1:5000");
}

#[test]
fn test_default_profile_drives_show() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["config", "set", "default_profile", "lab"])
        .assert()
        .success();
    studio(dir.path())
        .args(["config", "set", "api_url", "http://lab.local:5000"])
        .assert()
        .success();

    let output = studio(dir.path())
        .args(["--output", "json", "config", "show"])
        .output()
        .unwrap();
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["profile"], "lab");
    assert_eq!(view["api_url"], "http://lab.local:5000");
}

#[test]
fn test_bare_profile_key_needs_a_profile() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["config", "set", "api_url", "http://lab.local:5000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active profile"));
}

#[test]
fn test_run_with_missing_file_reports_upload_error() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["run"])
        .arg(dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error uploading file"));
}

#[test]
fn test_run_rejects_malformed_prediction_input() {
    let dir = tempfile::tempdir().unwrap();
    studio(dir.path())
        .args(["run", "data.csv", "--predict", "no-separator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected COLUMN=VALUE"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_trains_predicts_and_saves_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "data.csv",
            "shape": [4, 2],
            "rows": 4,
            "columns": ["y", "x"],
            "dtypes": {"y": "float64", "x": "float64"},
            "null_counts": {"y": 0, "x": 0},
            "head": "",
            "statistics": ""
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/train-regression"))
        .and(body_json(json!({
            "target_column": "y",
            "feature_columns": ["x"],
            "test_size": 0.25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "train_r2": 0.9,
            "test_r2": 0.85,
            "train_rmse": 0.1,
            "test_rmse": 0.2,
            "feature_importance": {"x": 1.0},
            "samples": 1,
            "actual": [2.0],
            "predicted": [2.1]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"data": {"y": null, "x": 3.0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_type": "regression",
            "prediction": 6.0
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/batch-predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "csv": "x,prediction\n1,2\n2,4\n"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    std::fs::write(&data, "y,x\n2,1\n4,2\n6,3\n8,4\n").unwrap();
    let out = dir.path().join("out");

    let mut cmd = studio(dir.path());
    cmd.args(["-o", "json", "--api-url", &server.uri(), "run"])
        .arg(&data)
        .args(["--test-size", "0.25", "--predict", "x=3", "--batch"])
        .arg(&data)
        .arg("--out-dir")
        .arg(&out);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Test R² Score\""))
        .stdout(predicate::str::contains("\"6.0000\""))
        .stdout(predicate::str::contains("\"count\": 2"));

    let saved = std::fs::read_to_string(out.join("predictions.csv")).unwrap();
    assert_eq!(saved, "x,prediction\n1,2\n2,4\n");
}
