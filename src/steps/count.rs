//! Step counting over expanded blocks.

use super::block::StepBlock;
use super::marker::is_reference;

/// Count the non-reference lines of a fully expanded block.
///
/// Reference lines are excluded whether or not they resolved; the steps
/// expanded beneath them are what get counted. Blank lines count as leaves.
/// This is the figure reported as `total_step_count`; it is an estimate
/// rather than the number MagicPod itself reports.
#[must_use]
pub fn count_leaf_steps(block: &StepBlock) -> usize {
    block.lines().filter(|line| !is_reference(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("Click submit", 1)]
    #[case("Open page\n  Type name\nClick submit\n", 3)]
    #[case("Open page\n\nClick submit", 3)]
    fn counts_every_line_without_references(#[case] text: &str, #[case] expected: usize) {
        let block = StepBlock::parse(text);
        assert_eq!(count_leaf_steps(&block), expected);
        assert_eq!(count_leaf_steps(&block), block.len());
    }

    #[rstest]
    #[case("Shared step: Login\n  Enter username\n  Enter password\nClick submit", 3)]
    #[case("Shared step: Ghost\nDo thing", 1)]
    #[case("Shared step: Login (2)\n  Enter username\n  Enter password", 2)]
    #[case("共有ステップ: ログイン\n  ユーザー名を入力", 1)]
    #[case("Shared step:\nDo thing", 2)]
    #[case("Shared step: Login\r  A\u{2028}  B", 2)]
    fn leaf_count_excludes_reference_lines(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(count_leaf_steps(&StepBlock::parse(text)), expected);
    }
}
