//! End-to-end tests driving the `navcat` binary.
//!
//! Stdout is a pipe here, so every command runs in JSON mode.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn navcat(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("navcat").unwrap();
    cmd.arg("--db")
        .arg(db)
        .env_remove("NAVCAT_DB")
        .env_remove("AUTH_ENABLED")
        .env_remove("AUTH_USERNAME")
        .env_remove("AUTH_PASSWORD")
        .env_remove("AUTH_SECRET")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn seed(db: &Path) {
    navcat(db).arg("init").assert().success();
    let group = json_stdout(navcat(db).args(["group", "add", "Dev"]));
    let group_id = group["id"].as_i64().unwrap().to_string();
    navcat(db)
        .args(["site", "add", &group_id, "Docs", "https://docs.rs", "--notes", "daily"])
        .assert()
        .success();
    navcat(db)
        .args(["config", "set", "theme", "dark"])
        .assert()
        .success();
}

#[test]
fn commands_fail_before_init() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("navcat.db");

    navcat(&db).args(["group", "list"]).assert().code(2);
    assert!(!db.exists());
}

#[test]
fn export_then_import_into_fresh_database() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source.db");
    let dest = temp_dir.path().join("dest.db");
    let file = temp_dir.path().join("backup.json");

    seed(&source);
    navcat(&source)
        .arg("export")
        .arg("--output")
        .arg(&file)
        .assert()
        .success();

    navcat(&dest).arg("init").assert().success();
    let result = json_stdout(navcat(&dest).arg("import").arg(&file));

    assert_eq!(result["success"], true);
    assert_eq!(result["stats"]["groups"]["created"], 1);
    assert_eq!(result["stats"]["groups"]["merged"], 0);
    assert_eq!(result["stats"]["sites"]["created"], 1);

    let sites = json_stdout(navcat(&dest).args(["site", "list"]));
    assert_eq!(sites["count"], 1);
    assert_eq!(sites["sites"][0]["notes"], "daily");

    let theme = json_stdout(navcat(&dest).args(["config", "get", "theme"]));
    assert_eq!(theme["value"], "dark");
}

#[test]
fn reimport_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("navcat.db");
    let file = temp_dir.path().join("backup.json");

    seed(&db);
    navcat(&db)
        .arg("export")
        .arg("--output")
        .arg(&file)
        .assert()
        .success();

    let result = json_stdout(navcat(&db).arg("import").arg(&file));
    assert_eq!(result["stats"]["groups"]["merged"], 1);
    assert_eq!(result["stats"]["groups"]["created"], 0);
    assert_eq!(result["stats"]["sites"]["updated"], 1);
    assert_eq!(result["stats"]["sites"]["created"], 0);

    let groups = json_stdout(navcat(&db).args(["group", "list"]));
    assert_eq!(groups["count"], 1);
}

#[test]
fn import_of_garbage_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("navcat.db");
    let file = temp_dir.path().join("bad.json");
    std::fs::write(&file, "{not json").unwrap();

    navcat(&db).arg("init").assert().success();
    navcat(&db).arg("import").arg(&file).assert().failure();
}

#[test]
fn reorder_and_delete_group() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("navcat.db");
    navcat(&db).arg("init").assert().success();

    let a = json_stdout(navcat(&db).args(["group", "add", "A"]));
    let b = json_stdout(navcat(&db).args(["group", "add", "B", "--order", "1"]));
    let (a, b) = (a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap());

    let reorder = json_stdout(navcat(&db).args([
        "group",
        "reorder",
        &format!("{a}=1"),
        &format!("{b}=0"),
    ]));
    assert_eq!(reorder["success"], true);

    let groups = json_stdout(navcat(&db).args(["group", "list"]));
    assert_eq!(groups["groups"][0]["name"], "B");

    navcat(&db)
        .args(["group", "delete", &b.to_string()])
        .assert()
        .success();
    navcat(&db)
        .args(["group", "show", &b.to_string()])
        .assert()
        .code(3);
}

#[test]
fn login_with_auth_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("navcat.db");

    let login = json_stdout(
        navcat(&db)
            .env("AUTH_ENABLED", "true")
            .env("AUTH_USERNAME", "admin")
            .env("AUTH_PASSWORD", "hunter2")
            .args(["login", "--username", "admin", "--password", "hunter2"]),
    );
    let token = login["token"].as_str().unwrap().to_string();

    navcat(&db)
        .env("AUTH_ENABLED", "true")
        .args(["verify", &token])
        .assert()
        .success();

    navcat(&db)
        .env("AUTH_ENABLED", "true")
        .env("AUTH_SECRET", "another-secret")
        .args(["verify", &token])
        .assert()
        .code(9);

    navcat(&db)
        .env("AUTH_ENABLED", "true")
        .env("AUTH_USERNAME", "admin")
        .env("AUTH_PASSWORD", "hunter2")
        .args(["login", "--username", "admin", "--password", "wrong"])
        .assert()
        .code(9);
}
