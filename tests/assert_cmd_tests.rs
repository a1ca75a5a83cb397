//! Integration tests for CLI execution using `assert_cmd`.
//!
//! These tests invoke the compiled binary against a local API fixture and
//! check that the JSON result goes to stdout while logs go to stderr.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use test_support::{Route, spawn_api_server};

const ROOT: &str = "/api/v1.0/Org/Proj";

fn project_routes() -> Vec<Route> {
    vec![
        Route::ok(
            format!("{ROOT}/shared-steps/?min_shared_step_number=1"),
            r#"{"shared_steps":[{"number":1,"name":"Login"}]}"#,
        ),
        Route::ok(
            format!("{ROOT}/shared-steps/?min_shared_step_number=2"),
            r#"{"shared_steps":[]}"#,
        ),
        Route::ok(
            format!("{ROOT}/shared-steps/1/"),
            r#"{"number":1,"name":"Login","human_readable_steps":"Enter username\nEnter password"}"#,
        ),
        Route::ok(
            format!("{ROOT}/test-cases/1/"),
            r#"{"number":1,"name":"Sign in","human_readable_steps":"Shared step: Login\nClick submit"}"#,
        ),
    ]
}

fn command(url: &str) -> Result<Command> {
    let mut cmd = Command::cargo_bin("magicpod-steps").context("locate magicpod-steps binary")?;
    cmd.env_remove("MAGICPOD_API_TOKEN")
        .args(["--base-url", &format!("{url}/api/v1.0")])
        .args(["-o", "Org", "-p", "Proj"]);
    Ok(cmd)
}

#[test]
fn prints_expanded_test_cases_as_json() -> Result<()> {
    let (url, server) = spawn_api_server(project_routes());
    let output = command(&url)?
        .args(["-t", "secret", "1"])
        .output()
        .context("run magicpod-steps")?;
    ensure!(output.status.success(), "run should succeed: {output:?}");

    let value: Value = serde_json::from_slice(&output.stdout).context("stdout is JSON")?;
    ensure!(
        value
            == json!([{
                "number": 1,
                "name": "Sign in",
                "human_readable_steps": "Shared step: Login\n  Enter username\n  Enter password\nClick submit",
                "total_step_count": 3,
            }]),
        "unexpected output: {value}"
    );
    let requests = server.requests();
    ensure!(
        requests
            .iter()
            .all(|r| r.header("authorization") == Some("Token secret")),
        "every request should carry the token"
    );
    Ok(())
}

#[test]
fn token_is_read_from_environment() -> Result<()> {
    let (url, _server) = spawn_api_server(project_routes());
    command(&url)?
        .env("MAGICPOD_API_TOKEN", "from-env")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[{"));
    Ok(())
}

#[test]
fn failed_request_logs_to_stderr_and_prints_nothing() -> Result<()> {
    let (url, _server) = spawn_api_server(project_routes());
    command(&url)?
        .args(["-t", "secret", "99"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("404"))
        .stderr(predicate::str::contains("test-cases/99/"));
    Ok(())
}

#[test]
fn missing_token_is_a_usage_error() -> Result<()> {
    let (url, server) = spawn_api_server(Vec::new());
    command(&url)?
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));
    ensure!(server.requests().is_empty(), "no request without a token");
    Ok(())
}

#[test]
fn verbose_flag_logs_requests_to_stderr() -> Result<()> {
    let (url, _server) = spawn_api_server(project_routes());
    command(&url)?
        .args(["-t", "secret", "-v", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetched shared steps").not())
        .stderr(predicate::str::contains("fetched shared steps"))
        .stderr(predicate::str::contains("REDACTED"));
    Ok(())
}
