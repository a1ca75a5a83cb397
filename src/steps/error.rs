//! Error types for shared-step expansion.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while expanding shared steps.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ExpandError {
    /// A shared step was reached again from within its own expansion.
    #[error("shared step cycle detected: {}", chain.join(" -> "))]
    #[diagnostic(
        code(magicpod_steps::steps::cycle_detected),
        help("break the cycle in MagicPod or run without --detect-cycles to reproduce the unguarded expansion")
    )]
    CycleDetected {
        /// Group names along the expansion path, ending with the repeat.
        chain: Vec<String>,
    },
}
