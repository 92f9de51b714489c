//! E2E tests for `tversky request`: JSON in, JSON out.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn tversky_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tversky"));
    cmd.current_dir(dir);
    cmd.env("TVERSKY_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("FORMAT");
    cmd
}

/// Disable diagrams so requests do not touch the filesystem.
fn without_diagrams(dir: &Path) {
    std::fs::write(dir.join("tversky.toml"), "[diagram]\nenabled = false\n").unwrap();
}

fn request(dir: &Path, body: &str) -> (bool, Value) {
    let output = tversky_cmd(dir)
        .arg("request")
        .write_stdin(body)
        .output()
        .expect("request should not crash");
    let json: Value = serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    });
    (output.status.success(), json)
}

#[test]
fn success_payload_from_stdin() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let (ok, json) = request(
        dir.path(),
        r#"{"setA": "x, y, z", "setB": "y, z, w", "alpha": 1, "beta": "1"}"#,
    );
    assert!(ok);
    assert_eq!(json["success"], true);
    assert_eq!(json["similarity"], 0.5);
    assert_eq!(json["imageUrl"], Value::Null);
    assert_eq!(json["log"].as_array().unwrap().len(), 13);
    assert_eq!(json["log"][11]["type"], "final_result");
    assert_eq!(json["log"][11]["degenerate"], false);
}

#[test]
fn request_is_read_from_file() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let path = dir.path().join("req.json");
    std::fs::write(&path, r#"{"setA": "a", "setB": "a"}"#).unwrap();
    let output = tversky_cmd(dir.path())
        .args(["request", "--file", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["similarity"], 1.0);
}

#[test]
fn request_writes_diagram_under_configured_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tversky.toml"),
        "[diagram]\noutput_dir = \"public\"\nurl_prefix = \"/public\"\n",
    )
    .unwrap();
    let (ok, json) = request(dir.path(), r#"{"setA": "a,b", "setB": "b"}"#);
    assert!(ok);
    let url = json["imageUrl"].as_str().expect("imageUrl");
    let file = url.strip_prefix("/public/").expect("prefix");
    assert!(dir.path().join("public").join(file).is_file());
}

#[test]
fn malformed_json_is_a_failure_payload() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let (ok, json) = request(dir.path(), "{ this is not json");
    assert!(!ok);
    assert_eq!(json["success"], false);
    assert_eq!(json["error_code"], "E2001");
    assert!(json["error"].as_str().unwrap().starts_with("Error: "));
    assert!(json.get("log").is_none());
}

#[test]
fn non_numeric_weight_is_a_failure_payload() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let (ok, json) = request(dir.path(), r#"{"setA": "a", "setB": "b", "alpha": "lots"}"#);
    assert!(!ok);
    assert_eq!(json["error_code"], "E2002");
    assert!(json["error"].as_str().unwrap().contains("lots"));
}

#[test]
fn strict_config_rejects_negative_weight() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tversky.toml"),
        "[diagram]\nenabled = false\n\n[validation]\nstrict = true\n",
    )
    .unwrap();
    let (ok, json) = request(dir.path(), r#"{"setA": "a", "setB": "b", "alpha": -1}"#);
    assert!(!ok);
    assert_eq!(json["error_code"], "E2003");
}

#[test]
fn empty_request_defaults_to_empty_sets() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let (ok, json) = request(dir.path(), "{}");
    assert!(ok);
    assert_eq!(json["similarity"], 0.0);
    assert_eq!(json["log"][11]["degenerate"], true);
}

#[test]
fn configured_weights_fill_in_missing_ones() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tversky.toml"),
        "[weights]\nalpha = 0.5\nbeta = 0.5\n\n[diagram]\nenabled = false\n",
    )
    .unwrap();
    // Dice: 1 / (1 + 0.5 + 0.5)
    let (ok, json) = request(dir.path(), r#"{"setA": "a,b", "setB": "b,c"}"#);
    assert!(ok);
    assert_eq!(json["similarity"], 0.5);
    assert_eq!(json["log"][0]["alpha"], 0.5);
}

#[test]
fn null_weight_is_a_failure_payload() {
    let dir = TempDir::new().unwrap();
    without_diagrams(dir.path());
    let (ok, json) = request(dir.path(), r#"{"setA": "a", "setB": "a", "beta": null}"#);
    assert!(!ok);
    assert_eq!(json["error_code"], "E2002");
}
