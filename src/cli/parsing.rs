//! CLI parsing helpers for clap value parsers.

/// Parse a test case number; MagicPod numbers start at 1.
pub(super) fn parse_test_case_number(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("{s} is not a valid test case number"))?;
    if value == 0 {
        return Err(String::from("test case numbers start at 1"));
    }
    Ok(value)
}

/// Accept an `http` or `https` base URL, dropping any trailing slash.
pub(super) fn parse_base_url(s: &str) -> Result<String, String> {
    let trimmed = s.trim().trim_end_matches('/');
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("https://") || lower.starts_with("http://")) {
        return Err(format!("base URL '{s}' must use http or https"));
    }
    Ok(trimmed.to_owned())
}
