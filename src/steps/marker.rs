//! Detection of shared-step reference lines.

use crate::locale::Locale;

/// Iterate over every recognised reference marker, in checking order.
pub fn reference_markers() -> impl Iterator<Item = &'static str> {
    Locale::ALL.into_iter().map(Locale::reference_marker)
}

/// Extract the referenced shared-step name from a single step line.
///
/// The line is trimmed and compared against each marker exactly
/// (case-sensitive). On a match the remainder after the marker is returned
/// as-is; callers trim it when generating lookup candidates. `None` means the
/// line is a leaf step, which includes a bare marker with nothing after it.
///
/// # Examples
///
/// ```
/// use magicpod_steps::steps::extract_reference_name;
///
/// assert_eq!(extract_reference_name("  Shared step: Login"), Some(" Login"));
/// assert_eq!(extract_reference_name("共有ステップ:ログイン"), Some("ログイン"));
/// assert_eq!(extract_reference_name("Click submit"), None);
/// ```
#[must_use]
pub fn extract_reference_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    reference_markers()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .filter(|name| !name.is_empty())
}

/// Whether `line` refers to a shared step.
#[must_use]
pub fn is_reference(line: &str) -> bool {
    extract_reference_name(line).is_some()
}
