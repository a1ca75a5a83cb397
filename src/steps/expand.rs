//! Recursive expansion of shared-step references.
//!
//! Every reference line is kept and followed by the expanded steps of the
//! group it resolves to, indented two spaces past the reference line's own
//! indentation. Groups are expanded afresh each time they are referenced;
//! nothing is memoised and neither the table nor any group is modified.
//!
//! Expansion is unguarded by default: a group that reaches itself again
//! recurses until the stack is exhausted. [`CyclePolicy::Detect`] tracks the
//! groups on the current expansion path and fails with
//! [`ExpandError::CycleDetected`] instead.

use std::convert::Infallible;

use tracing::trace;

use super::block::{StepBlock, split_lines};
use super::error::ExpandError;
use super::marker::extract_reference_name;
use super::table::SharedStepTable;

/// Extra indentation applied to a group's steps under its reference line.
pub const NESTED_INDENT: usize = 2;

/// How expansion treats a group that references itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Recurse without checks.
    #[default]
    Unguarded,
    /// Fail when a group reappears on its own expansion path.
    Detect,
}

/// Expands step blocks against a fixed table of shared steps.
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    table: &'a SharedStepTable,
    policy: CyclePolicy,
}

impl<'a> Expander<'a> {
    /// Create an expander reading from `table`.
    #[must_use]
    pub const fn new(table: &'a SharedStepTable, policy: CyclePolicy) -> Self {
        Self { table, policy }
    }

    /// Expand every reference in `block`.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::CycleDetected`] when cycle detection is enabled
    /// and a group is reached again from within its own expansion.
    pub fn expand(&self, block: &StepBlock) -> Result<StepBlock, ExpandError> {
        match self.policy {
            CyclePolicy::Unguarded => Ok(expand(block, self.table)),
            CyclePolicy::Detect => {
                let lines = expand_lines(block.lines(), self.table, &mut PathGuard::default())?;
                Ok(StepBlock::from_lines(lines, block.has_trailing_newline()))
            }
        }
    }

    /// Expand raw step text, returning the rendered result.
    ///
    /// # Errors
    ///
    /// See [`Expander::expand`].
    pub fn expand_text(&self, text: &str) -> Result<String, ExpandError> {
        self.expand(&StepBlock::parse(text))
            .map(|block| block.to_string())
    }
}

/// Expand every reference in `block` without cycle detection.
///
/// # Examples
///
/// ```
/// use magicpod_steps::model::SharedStep;
/// use magicpod_steps::steps::{SharedStepTable, StepBlock, expand};
///
/// let table = SharedStepTable::from_groups([SharedStep {
///     number: 1,
///     name: "Login".into(),
///     human_readable_steps: "Enter username\nEnter password".into(),
/// }]);
/// let block = StepBlock::parse("Shared step: Login\nClick submit");
/// assert_eq!(
///     expand(&block, &table).to_string(),
///     "Shared step: Login\n  Enter username\n  Enter password\nClick submit"
/// );
/// ```
#[must_use]
pub fn expand(block: &StepBlock, table: &SharedStepTable) -> StepBlock {
    let Ok(lines) = expand_lines(block.lines(), table, &mut NoGuard);
    StepBlock::from_lines(lines, block.has_trailing_newline())
}

/// Tracks the groups entered along one expansion path.
trait CycleGuard {
    type Error;

    fn enter(&mut self, name: &str) -> Result<(), Self::Error>;

    fn leave(&mut self);
}

struct NoGuard;

impl CycleGuard for NoGuard {
    type Error = Infallible;

    fn enter(&mut self, _name: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn leave(&mut self) {}
}

#[derive(Default)]
struct PathGuard {
    path: Vec<String>,
}

impl CycleGuard for PathGuard {
    type Error = ExpandError;

    fn enter(&mut self, name: &str) -> Result<(), Self::Error> {
        if self.path.iter().any(|entered| entered == name) {
            let mut chain = self.path.clone();
            chain.push(name.to_owned());
            return Err(ExpandError::CycleDetected { chain });
        }
        self.path.push(name.to_owned());
        Ok(())
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

fn expand_lines<'l, G: CycleGuard>(
    lines: impl Iterator<Item = &'l str>,
    table: &SharedStepTable,
    guard: &mut G,
) -> Result<Vec<String>, G::Error> {
    let mut out = Vec::new();
    for line in lines {
        out.push(line.to_owned());
        let Some(reference) = extract_reference_name(line) else {
            continue;
        };
        let Some(group) = table.resolve(reference) else {
            trace!(reference = reference.trim(), "shared step reference left unresolved");
            continue;
        };
        guard.enter(&group.name)?;
        let nested = expand_lines(split_lines(&group.human_readable_steps), table, guard);
        guard.leave();
        let pad = " ".repeat(NESTED_INDENT + leading_whitespace(line));
        out.extend(nested?.into_iter().map(|nested_line| indent(nested_line, &pad)));
    }
    Ok(out)
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Prefix `line` with `pad` unless it is blank.
fn indent(line: String, pad: &str) -> String {
    if line.trim().is_empty() {
        line
    } else {
        format!("{pad}{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SharedStep;
    use rstest::rstest;

    fn table(groups: &[(&str, &str)]) -> SharedStepTable {
        SharedStepTable::from_groups(groups.iter().zip(1..).map(|((name, steps), number)| {
            SharedStep {
                number,
                name: (*name).to_owned(),
                human_readable_steps: (*steps).to_owned(),
            }
        }))
    }

    fn expand_str(text: &str, table: &SharedStepTable) -> String {
        expand(&StepBlock::parse(text), table).to_string()
    }

    #[rstest]
    #[case("Click submit")]
    #[case("Open page\n  Type name\nClick submit")]
    #[case("Open page\n")]
    #[case("")]
    fn block_without_references_is_unchanged(#[case] text: &str) {
        let groups = table(&[("Login", "Enter username")]);
        assert_eq!(expand_str(text, &groups), text);
    }

    #[rstest]
    fn expands_reference_inline() {
        let groups = table(&[("Login", "Enter username\nEnter password")]);
        assert_eq!(
            expand_str("Shared step: Login\nClick submit", &groups),
            "Shared step: Login\n  Enter username\n  Enter password\nClick submit"
        );
    }

    #[rstest]
    #[case("Shared step: Login", "  ")]
    #[case("  Shared step: Login", "    ")]
    #[case("\tShared step: Login", "   ")]
    #[case("    共有ステップ: Login", "      ")]
    fn indents_by_two_plus_reference_indent(#[case] line: &str, #[case] pad: &str) {
        let groups = table(&[("Login", "Enter username")]);
        assert_eq!(
            expand_str(line, &groups),
            format!("{line}\n{pad}Enter username")
        );
    }

    #[rstest]
    fn nested_groups_accumulate_indentation() {
        let groups = table(&[
            ("Login", "Open login page\nShared step: Credentials\nClick login"),
            ("Credentials", "Enter username\n  Shared step: Password"),
            ("Password", "Enter password"),
        ]);
        let expected = "\
Shared step: Login
  Open login page
  Shared step: Credentials
    Enter username
      Shared step: Password
        Enter password
  Click login
Done";
        assert_eq!(expand_str("Shared step: Login\nDone", &groups), expected);
    }

    #[rstest]
    fn blank_group_lines_are_not_indented() {
        let groups = table(&[("Login", "Enter username\n\nEnter password")]);
        assert_eq!(
            expand_str("Shared step: Login", &groups),
            "Shared step: Login\n  Enter username\n\n  Enter password"
        );
    }

    #[rstest]
    fn unresolved_reference_is_left_alone() {
        let empty = SharedStepTable::default();
        let text = "Shared step: Ghost\nDo thing";
        assert_eq!(expand_str(text, &empty), text);
    }

    #[rstest]
    #[case("A\rB")]
    #[case("A\u{2028}B")]
    #[case("A\r\nB\n")]
    fn group_lines_split_on_any_line_break(#[case] steps: &str) {
        let groups = table(&[("Login", steps)]);
        assert_eq!(
            expand_str("Shared step: Login", &groups),
            "Shared step: Login\n  A\n  B"
        );
    }

    #[rstest]
    fn repeated_references_expand_each_time() {
        let groups = table(&[("Login", "Enter username")]);
        assert_eq!(
            expand_str("Shared step: Login\nShared step: Login (again)", &groups),
            "Shared step: Login\n  Enter username\nShared step: Login (again)\n  Enter username"
        );
    }

    #[rstest]
    fn expansion_is_idempotent_once_references_are_gone() {
        let groups = table(&[("Login", "Enter username")]);
        let once = expand_str("Open page\nClick submit", &groups);
        assert_eq!(expand_str(&once, &groups), once);
    }

    #[rstest]
    fn guarded_expansion_matches_unguarded_without_cycles() {
        let groups = table(&[
            ("Login", "Shared step: Credentials\nShared step: Credentials"),
            ("Credentials", "Enter username"),
        ]);
        let block = StepBlock::parse("Shared step: Login\nDone\n");
        let guarded = Expander::new(&groups, CyclePolicy::Detect)
            .expand(&block)
            .expect("diamond references are not cycles");
        assert_eq!(guarded, expand(&block, &groups));
        assert!(guarded.has_trailing_newline());
    }

    #[rstest]
    fn detects_direct_cycle() {
        let groups = table(&[("Loop", "Step\nShared step: Loop")]);
        let err = Expander::new(&groups, CyclePolicy::Detect)
            .expand_text("Shared step: Loop")
            .expect_err("self reference must be detected");
        let ExpandError::CycleDetected { chain } = err;
        assert_eq!(chain, ["Loop", "Loop"]);
    }

    #[rstest]
    fn detects_transitive_cycle_through_parameterised_reference() {
        let groups = table(&[
            ("A", "Shared step: B (user: x)"),
            ("B", "Shared step: C"),
            ("C", "Shared step: A (2)"),
        ]);
        let err = Expander::new(&groups, CyclePolicy::Detect)
            .expand_text("Start\nShared step: A")
            .expect_err("cycle must be detected");
        assert_eq!(err.to_string(), "shared step cycle detected: A -> B -> C -> A");
    }
}
