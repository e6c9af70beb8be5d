/// Prefix that marks a table pattern as a suffix wildcard.
pub const WILDCARD_PREFIX: &str = "*.";

/// Canonical form used for every table key and every queried name:
/// surrounding whitespace removed, ASCII lowercase, trailing dots stripped.
///
/// Stripping all trailing dots (not just one) keeps the function idempotent.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

pub fn is_wildcard(pattern: &str) -> bool {
    pattern.starts_with(WILDCARD_PREFIX)
}

/// Literal remainder of a wildcard pattern (`*.kddi-mmbb.jp` -> `kddi-mmbb.jp`).
pub fn wildcard_suffix(pattern: &str) -> Option<&str> {
    pattern.strip_prefix(WILDCARD_PREFIX)
}
