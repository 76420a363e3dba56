/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip one leading and one trailing markdown code fence from a response.
///
/// The leading fence may carry a `json` tag.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Recover a JSON array from model output that may be wrapped in fences or prose.
///
/// Fences are stripped first, then the text is sliced from the first `[` to the
/// last `]` inclusive. When no such span exists the fence-stripped text is
/// returned unchanged and left for the JSON parser to reject.
pub fn extract_json_array(response: &str) -> &str {
    let clean = strip_code_blocks(response);
    match (clean.find('['), clean.rfind(']')) {
        (Some(start), Some(end)) if start < end => &clean[start..=end],
        _ => clean,
    }
}
