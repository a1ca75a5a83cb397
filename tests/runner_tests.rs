//! End-to-end runner coverage using an in-memory source.
//!
//! These tests drive [`runner::run_with`] exactly as the binary does, but
//! against [`FakeSource`] and an in-memory writer.

use anyhow::Result;
use magicpod_steps::api::Collection;
use magicpod_steps::runner::{self, RunOptions};
use magicpod_steps::steps::CyclePolicy;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_support::error::display_error_chain;
use test_support::fake_source::object;
use test_support::{FakeRequest, FakeSource};

#[fixture]
fn project() -> FakeSource {
    FakeSource::new()
        .with_shared_step(1, "Login", "Enter username\nEnter password")
        .with_shared_step(2, "Checkout", "Shared step: Login (admin)\nClick pay")
        .with_test_case(1, "Shared step: Login\nClick submit")
        .with_test_case(2, "Shared step: Ghost\nDo thing")
        .with_test_case(3, "Open cart\n  Shared step: Checkout")
}

fn run_to_json(source: &FakeSource, options: &RunOptions) -> Result<Value> {
    let mut out = Vec::new();
    runner::run_with(source, options, &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.ends_with('\n'), "output should end with a newline");
    Ok(serde_json::from_str(&text)?)
}

#[rstest]
fn prints_every_expanded_test_case(project: FakeSource) -> Result<()> {
    let output = run_to_json(&project, &RunOptions::default())?;
    assert_eq!(
        output,
        json!([
            {
                "number": 1,
                "name": "Test case 1",
                "human_readable_steps": "Shared step: Login\n  Enter username\n  Enter password\nClick submit",
                "total_step_count": 3,
            },
            {
                "number": 2,
                "name": "Test case 2",
                "human_readable_steps": "Shared step: Ghost\nDo thing",
                "total_step_count": 1,
            },
            {
                "number": 3,
                "name": "Test case 3",
                "human_readable_steps": "Open cart\n  Shared step: Checkout\n    Shared step: Login (admin)\n      Enter username\n      Enter password\n    Click pay",
                "total_step_count": 4,
            },
        ])
    );
    Ok(())
}

#[rstest]
fn shared_steps_are_fetched_before_test_cases(project: FakeSource) -> Result<()> {
    let options = RunOptions {
        test_case_numbers: vec![2],
        ..RunOptions::default()
    };
    run_to_json(&project, &options)?;
    let requests = project.requests();
    let first_test_case = requests
        .iter()
        .position(|r| matches!(r, FakeRequest::One(Collection::TestCases, _)))
        .expect("test case fetched");
    assert!(
        requests[..first_test_case]
            .iter()
            .all(|r| !matches!(r, FakeRequest::One(Collection::TestCases, _) | FakeRequest::Page(Collection::TestCases, _)))
    );
    assert_eq!(
        requests.last(),
        Some(&FakeRequest::One(Collection::TestCases, 2))
    );
    Ok(())
}

#[rstest]
fn extra_fields_survive_in_original_order() -> Result<()> {
    let source = FakeSource::new().with_test_case_record(object(json!({
        "number": 7,
        "human_readable_steps": "Click",
        "name": "Keeps fields",
        "description": "日本語の説明",
        "step_count": 1,
    })));
    let mut out = Vec::new();
    runner::run_with(&source, &RunOptions::default(), &mut out)?;
    let text = String::from_utf8(out)?;
    assert_eq!(
        text,
        "[{\"number\":7,\"human_readable_steps\":\"Click\",\"name\":\"Keeps fields\",\"description\":\"日本語の説明\",\"step_count\":1,\"total_step_count\":1}]\n"
    );
    Ok(())
}

#[rstest]
fn failed_fetch_writes_nothing(project: FakeSource) {
    let source = project.failing(Collection::TestCases, 2);
    let mut out = Vec::new();
    let err = runner::run_with(&source, &RunOptions::default(), &mut out)
        .expect_err("fetch failure aborts the run");
    assert!(out.is_empty(), "no partial output expected");
    assert_eq!(
        display_error_chain(err.as_ref()),
        "fetching test cases: request to fake://test-cases/2/ failed with status 404 Not Found"
    );
    assert!(runner::diagnostic_help(&err).is_some_and(|help| help.contains("API token")));
}

#[rstest]
fn cycle_detection_is_opt_in() {
    let source = FakeSource::new()
        .with_shared_step(1, "Loop", "Again\nShared step: Loop")
        .with_test_case(1, "Shared step: Loop");
    let options = RunOptions {
        cycle_policy: CyclePolicy::Detect,
        ..RunOptions::default()
    };
    let mut out = Vec::new();
    let err = runner::run_with(&source, &options, &mut out).expect_err("cycle detected");
    assert!(out.is_empty());
    assert_eq!(
        display_error_chain(err.as_ref()),
        "expanding test case 1: shared step cycle detected: Loop -> Loop"
    );
    assert!(runner::diagnostic_help(&err).is_some());
}

#[rstest]
fn empty_project_prints_empty_array() -> Result<()> {
    let output = run_to_json(&FakeSource::new(), &RunOptions::default())?;
    assert_eq!(output, json!([]));
    Ok(())
}
