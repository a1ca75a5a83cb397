//! Line-oriented step text.

use std::fmt;

/// An ordered sequence of step lines.
///
/// Lines end at any Unicode line boundary: `\n`, `\r\n`, a lone `\r`, the
/// vertical tab and form feed, the file, group and record separators, NEL and
/// the line and paragraph separators. Whether the source text ended with a
/// line break is remembered; rendering joins lines with `\n` and reproduces
/// that final break as `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepBlock {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl StepBlock {
    /// Split `text` into lines.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            lines: split_lines(text).map(str::to_owned).collect(),
            trailing_newline: text.chars().next_back().is_some_and(is_line_break),
        }
    }

    pub(crate) const fn from_lines(lines: Vec<String>, trailing_newline: bool) -> Self {
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Iterate over the lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the block has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the source text ended with a newline.
    #[must_use]
    pub const fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }
}

/// Whether `ch` ends a line on its own.
const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` into lines without their terminators.
///
/// `\r\n` counts as a single break. A final break does not start an extra
/// empty line.
pub(crate) const fn split_lines(text: &str) -> SplitLines<'_> {
    SplitLines { rest: text }
}

/// Iterator returned by [`split_lines`].
pub(crate) struct SplitLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Some((idx, ch)) = self.rest.char_indices().find(|&(_, c)| is_line_break(c)) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let (line, tail) = self.rest.split_at(idx);
        self.rest = tail
            .strip_prefix("\r\n")
            .or_else(|| tail.strip_prefix(ch))
            .unwrap_or(tail);
        Some(line)
    }
}

impl From<&str> for StepBlock {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for StepBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        if self.trailing_newline {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
