//! Validation helpers used by model inputs.

/// Returns `true` for absolute URLs (`http://c1.img`, `https://example.com/logo.png`).
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Returns `true` if `s` is empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Company handles are lowercase slugs: `[a-z0-9-]+`.
pub fn is_handle(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
