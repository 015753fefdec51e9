//! Command-line integration tests
//!
//! Run with: cargo test --test cli

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn msisdnd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msisdnd"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to run msisdnd")
}

fn write_config(dir: &Path, contents: &str) -> String {
    let path = dir.join("msisdnd.yaml");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_validate_accepts_defaults() {
    let output = msisdnd(&["--validate"]);
    assert!(output.status.success(), "{:?}", output);
}

#[test]
fn test_validate_accepts_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
server:
  address: "127.0.0.1:1"
directory:
  builtin: false
  countries:
    - country_code: "389"
      country_identifier: mk
  operators:
    - country_code: "389"
      prefix: "77"
      mno: A1
"#,
    );

    // Exits before binding, so an unusable address is fine
    let output = msisdnd(&["--config", &path, "--validate"]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("configuration is valid"));
}

#[test]
fn test_validate_rejects_invalid_directory() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
directory:
  builtin: false
  countries:
    - country_code: "389"
      country_identifier: mk
  operators:
    - country_code: "999"
      prefix: "1"
      mno: Nobody
"#,
    );

    let output = msisdnd(&["--config", &path, "--validate"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid prefix directory"), "{stderr}");
}

#[test]
fn test_validate_rejects_missing_config() {
    let output = msisdnd(&["--config", "/nonexistent/msisdnd.yaml", "--validate"]);
    assert!(!output.status.success());
}
