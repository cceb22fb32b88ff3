pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Handles compare exactly after trimming surrounding whitespace.
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().to_string()
}
