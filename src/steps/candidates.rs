//! Candidate names for resolving a possibly parameterised reference.
//!
//! References often carry trailing annotations, for example
//! `Login (2) (email: xxx.com, password: 123456)`. Lookup probes the name as
//! written first, then with each trailing parenthesised group peeled off in
//! turn, so the most specific registered group wins.

use std::iter::FusedIterator;

/// Lazily yields progressively shorter candidate names.
///
/// The sequence is finite because every candidate is strictly shorter than
/// the previous one. Clone the iterator to restart it from the same point.
///
/// # Examples
///
/// ```
/// use magicpod_steps::steps::NameCandidates;
///
/// let names: Vec<_> =
///     NameCandidates::new("Login (2) (email: xxx.com, password: 123456)").collect();
/// assert_eq!(
///     names,
///     ["Login (2) (email: xxx.com, password: 123456)", "Login (2)", "Login"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NameCandidates<'a> {
    next: Option<&'a str>,
}

impl<'a> NameCandidates<'a> {
    /// Start generating candidates for `reference`.
    #[must_use]
    pub fn new(reference: &'a str) -> Self {
        Self {
            next: Some(reference.trim()),
        }
    }
}

impl<'a> Iterator for NameCandidates<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = strip_trailing_group(current);
        Some(current)
    }
}

impl FusedIterator for NameCandidates<'_> {}

/// Remove the parenthesised group that ends `text`, trimming what remains.
///
/// The group starts at the `(` balancing the final `)`. Returns `None` when
/// `text` does not end with `)` or the closing parenthesis has no partner.
fn strip_trailing_group(text: &str) -> Option<&str> {
    let body = text.strip_suffix(')')?;
    let mut depth = 0_usize;
    for (idx, ch) in body.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' if depth == 0 => return text.get(..idx).map(str::trim),
            '(' => depth -= 1,
            _ => {}
        }
    }
    None
}
