//! Fetch, expand and print.
//!
//! This module keeps `main` minimal: [`run`] builds the HTTP client from the
//! parsed [`Cli`] and hands over to [`run_with`], which works against any
//! [`RemoteSource`] and writer so tests can drive the whole pipeline with
//! in-memory data.

use std::io::Write;

use anyhow::{Context, Result};
use miette::Diagnostic;
use tracing::{debug, info};

use crate::api::{
    ApiError, ClientConfig, MagicPodClient, RemoteSource, fetch_shared_steps, fetch_test_cases,
};
use crate::cli::Cli;
use crate::model::TestCase;
use crate::steps::{
    CyclePolicy, ExpandError, Expander, SharedStepTable, StepBlock, count_leaf_steps,
};

/// What to fetch and how to expand it, independent of the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Test cases to fetch; empty means all of them.
    pub test_case_numbers: Vec<u64>,
    /// Treatment of self-referencing shared steps.
    pub cycle_policy: CyclePolicy,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            test_case_numbers: cli.test_case_numbers.clone(),
            cycle_policy: if cli.detect_cycles {
                CyclePolicy::Detect
            } else {
                CyclePolicy::Unguarded
            },
        }
    }
}

impl From<&Cli> for ClientConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            token: cli.token.clone(),
            organization: cli.organization.clone(),
            project: cli.project.clone(),
            locale: cli.locale,
        }
    }
}

/// Execute the parsed [`Cli`], printing the expanded test cases to stdout.
///
/// # Errors
///
/// Returns an error if the client cannot be configured, any request fails,
/// a record is malformed, expansion detects a cycle, or stdout cannot be
/// written.
pub fn run(cli: &Cli) -> Result<()> {
    debug!(?cli, "starting");
    let client = MagicPodClient::new(&ClientConfig::from(cli)).context("configuring API client")?;
    let stdout = std::io::stdout();
    run_with(&client, &RunOptions::from(cli), &mut stdout.lock())
}

/// Fetch and expand test cases from `source`, writing them to `out` as a
/// JSON array followed by a newline.
///
/// Nothing is written unless every request and expansion succeeded.
///
/// # Errors
///
/// See [`run`].
pub fn run_with<S, W>(source: &S, options: &RunOptions, out: &mut W) -> Result<()>
where
    S: RemoteSource + ?Sized,
    W: Write + ?Sized,
{
    let cases = expand_test_cases(source, options)?;
    serde_json::to_writer(&mut *out, &cases).context("writing test cases as JSON")?;
    writeln!(out).context("writing test cases as JSON")?;
    out.flush().context("flushing output")
}

/// Fetch every shared step and the requested test cases, then expand each
/// test case's steps and record its step count.
///
/// # Errors
///
/// See [`run`].
pub fn expand_test_cases<S>(source: &S, options: &RunOptions) -> Result<Vec<TestCase>>
where
    S: RemoteSource + ?Sized,
{
    let shared_steps = fetch_shared_steps(source).context("fetching shared steps")?;
    info!(count = shared_steps.len(), "fetched shared steps");
    let mut cases =
        fetch_test_cases(source, &options.test_case_numbers).context("fetching test cases")?;
    info!(count = cases.len(), "fetched test cases");

    let table = SharedStepTable::from_groups(shared_steps);
    let expander = Expander::new(&table, options.cycle_policy);
    for case in &mut cases {
        let block = expander
            .expand(&StepBlock::parse(case.human_readable_steps()))
            .with_context(|| format!("expanding test case {}", case.number()))?;
        let total = count_leaf_steps(&block);
        debug!(number = case.number(), total_step_count = total, "expanded test case");
        case.set_expanded(block.to_string(), total);
    }
    Ok(cases)
}

/// Help text attached to the error behind `err`, if it carries any.
#[must_use]
pub fn diagnostic_help(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<ApiError>()
        .and_then(|api| api.help().map(|help| help.to_string()))
        .or_else(|| {
            err.downcast_ref::<ExpandError>()
                .and_then(|expand| expand.help().map(|help| help.to_string()))
        })
}
