//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure. Parsed arguments are turned into
//! [`RunOptions`](crate::runner::RunOptions) by the runner so the fetch and
//! expansion pipeline never depends on clap directly.

use clap::Parser;

use crate::locale::Locale;

mod parsing;

use parsing::{parse_base_url, parse_test_case_number};

/// Root of the MagicPod REST API.
pub const DEFAULT_BASE_URL: &str = "https://app.magicpod.com/api/v1.0";

/// Environment variable consulted when `--token` is omitted.
pub const TOKEN_ENV: &str = "MAGICPOD_API_TOKEN";

/// Fetch MagicPod test cases with every shared step expanded inline.
///
/// The expanded test cases are printed to stdout as a JSON array; each entry
/// gains a `total_step_count` field.
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API token used for the `Authorization` header.
    #[arg(short, long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: String,

    /// Organization name as it appears in MagicPod URLs.
    #[arg(short, long)]
    pub organization: String,

    /// Project name as it appears in MagicPod URLs.
    #[arg(short, long)]
    pub project: String,

    /// Only retrieve the test cases with these numbers.
    ///
    /// When omitted, every test case in the project is retrieved.
    #[arg(value_name = "TEST_CASE_NUMBER", value_parser = parse_test_case_number)]
    pub test_case_numbers: Vec<u64>,

    /// Language of `human_readable_steps` in the response.
    #[arg(short, long, value_enum, default_value_t = Locale::Ja)]
    pub locale: Locale,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Fail when a shared step references itself, directly or transitively.
    ///
    /// Without this flag such a reference recurses until the process runs
    /// out of stack.
    #[arg(long)]
    pub detect_cycles: bool,

    /// Override the API root, mainly for testing against a local server.
    #[arg(
        long,
        value_name = "URL",
        default_value = DEFAULT_BASE_URL,
        value_parser = parse_base_url,
        hide = true
    )]
    pub base_url: String,
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("token", &"***REDACTED***")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("test_case_numbers", &self.test_case_numbers)
            .field("locale", &self.locale)
            .field("verbose", &self.verbose)
            .field("detect_cycles", &self.detect_cycles)
            .field("base_url", &self.base_url)
            .finish()
    }
}
