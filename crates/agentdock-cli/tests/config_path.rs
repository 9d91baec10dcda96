use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("chat_path ="));
    assert!(contents.contains("# filter ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_url_persists_value() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[widget]\ntitle = \"Ops Bot\"\n").unwrap();

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["config", "set-url", "http://10.1.2.3:8000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved base_url"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("base_url = \"http://10.1.2.3:8000\""));
    assert!(contents.contains("title = \"Ops Bot\""));
}

#[test]
fn test_config_set_url_rejects_garbage() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["config", "set-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid agent base URL"));
}

#[test]
fn test_broken_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[endpoint\n").unwrap();

    cargo_bin_cmd!("agentdock")
        .env("AGENTDOCK_HOME", dir.path())
        .args(["send", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}
