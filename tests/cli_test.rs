//! End-to-end tests of the `press-share` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Write a config that points every path into `dir`
fn write_config(dir: &Path, api_base: Option<&str>) -> std::path::PathBuf {
    let mut text = format!(
        "spool_dir = {:?}\ncredentials_path = {:?}\nrequest_timeout_secs = 5\n",
        dir.join("spool").display().to_string(),
        dir.join("credentials.toml").display().to_string(),
    );
    if let Some(base) = api_base {
        text.push_str(&format!("api_base = {base:?}\n"));
    }
    let path = dir.join("config.toml");
    std::fs::write(&path, text).unwrap();
    path
}

fn press_share(dir: &TempDir, api_base: Option<&str>) -> Command {
    let config = write_config(dir.path(), api_base);
    let mut cmd = Command::cargo_bin("press-share").unwrap();
    cmd.env_remove("PRESS_SHARE_TOKEN")
        .env_remove("PRESS_SHARE_USERNAME")
        .env_remove("PRESS_SHARE_API_BASE")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("press-share")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("post"))
        .stdout(predicate::str::contains("resume"))
        .stdout(predicate::str::contains("sites"));
}

#[test]
fn test_post_without_account_shows_notice() {
    let dir = tempfile::tempdir().unwrap();
    press_share(&dir, None)
        .args(["post", "--text", "Hello", "--site", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No WordPress.com Account"))
        .stderr(predicate::str::contains("Cancel Share"));
}

#[test]
fn test_invalid_status_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    press_share(&dir, None)
        .args(["post", "--text", "Hello", "--status", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn test_auth_setup_prints_instructions() {
    let dir = tempfile::tempdir().unwrap();
    press_share(&dir, None)
        .args(["auth", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRESS_SHARE_TOKEN"))
        .stdout(predicate::str::contains("credentials.toml"));
}

#[test]
fn test_malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "request_timeout_secs = 0\n").unwrap();

    Command::cargo_bin("press-share")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["auth", "setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("request_timeout_secs"));
}

#[test]
fn test_resume_with_empty_spool() {
    let dir = tempfile::tempdir().unwrap();
    press_share(&dir, None)
        .env("PRESS_SHARE_TOKEN", "test-token")
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to resume"));
}

#[test]
fn test_post_uses_shared_credential_file() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/sites/42/posts/new")
        .match_header("authorization", "Bearer file-token")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "title": "Hello world",
            "status": "draft",
        })))
        .with_status(200)
        .with_body(r#"{"ID": 9, "URL": "https://myblog.example/?p=9"}"#)
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("credentials.toml"),
        "access_token = \"file-token\"\nusername = \"alice\"\n\n[primary_site]\nid = 42\nname = \"My Blog\"\n",
    )
    .unwrap();

    press_share(&dir, Some(&format!("{}/", server.url())))
        .args(["post", "--text", "Hello world\nbody", "--status", "draft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared to My Blog"));

    mock.assert();
    // Spool cleaned up once every upload finished
    let spool = dir.path().join("spool");
    let leftovers = std::fs::read_dir(&spool).map_or(0, Iterator::count);
    assert_eq!(leftovers, 0);
}

#[test]
fn test_sites_lists_account_sites() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/me/sites")
        .match_header("authorization", "Bearer env-token")
        .with_status(200)
        .with_body(
            r#"{"sites": [
                {"ID": 42, "name": "My Blog", "URL": "https://myblog.example"},
                {"ID": 7, "name": "", "URL": "https://other.example"}
            ]}"#,
        )
        .create();

    let dir = tempfile::tempdir().unwrap();
    press_share(&dir, Some(&format!("{}/", server.url())))
        .env("PRESS_SHARE_TOKEN", "env-token")
        .arg("sites")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Blog"))
        .stdout(predicate::str::contains("https://other.example"));
}

fn write_credentials(dir: &Path, with_site: bool) {
    let mut text = "access_token = \"file-token\"\nusername = \"alice\"\n".to_string();
    if with_site {
        text.push_str("\n[primary_site]\nid = 42\nname = \"My Blog\"\n");
    }
    std::fs::write(dir.join("credentials.toml"), text).unwrap();
}

fn spool_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir.join("spool")).map_or(0, Iterator::count)
}

#[test]
fn test_detached_post_is_sent_by_resume() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/sites/42/posts/new")
        .match_header("authorization", "Bearer file-token")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "title": "Later",
        })))
        .with_status(200)
        .with_body(r#"{"ID": 11}"#)
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    write_credentials(dir.path(), true);
    let base = format!("{}/", server.url());

    let output = press_share(&dir, Some(&base))
        .args(["post", "--text", "Later", "--detach"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let session = stdout
        .split("--session ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("resume hint in output")
        .to_string();
    assert!(dir.path().join("spool").join(&session).exists());

    press_share(&dir, Some(&base))
        .args(["resume", "--session", &session])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming 1 upload(s)"));

    // Sent exactly once, by the resume
    mock.assert();
    assert_eq!(spool_entries(dir.path()), 0);
}

#[test]
fn test_post_without_destination_leaves_no_session() {
    let dir = tempfile::tempdir().unwrap();
    write_credentials(dir.path(), false);

    press_share(&dir, None)
        .args(["post", "--text", "Hello"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--site"));

    assert_eq!(spool_entries(dir.path()), 0);
}

#[test]
fn test_resume_rejects_path_like_session() {
    let dir = tempfile::tempdir().unwrap();
    let other = dir.path().join("spool").join("press-share.background.other");
    std::fs::create_dir_all(&other).unwrap();
    std::fs::write(other.join("pending.json"), "{}").unwrap();

    for session in ["", ".."] {
        press_share(&dir, None)
            .env("PRESS_SHARE_TOKEN", "test-token")
            .args(["resume", "--session", session])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid session identifier"));
    }

    assert!(other.join("pending.json").exists());
}
