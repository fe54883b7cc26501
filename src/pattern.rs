//! Wildcard matching for action and resource patterns.

/// Matches zero or more characters.
pub const WILDCARD: char = '*';

/// Decide whether `literal` matches `pattern`.
///
/// Matching is case-sensitive and anchored at both ends. `*` matches any run of
/// characters, including none. An empty pattern matches nothing, a lone `*`
/// matches everything.
pub fn matches(pattern: &str, literal: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    if pattern.len() == 1 && pattern.starts_with(WILDCARD) {
        return true;
    }

    let segments: Vec<&str> = pattern.split(WILDCARD).collect();
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return false,
    };
    let Some((last, interior)) = rest.split_last() else {
        // No wildcard at all.
        return pattern == literal;
    };

    let Some(remaining) = literal.strip_prefix(first) else {
        return false;
    };
    let Some(mut remaining) = remaining.strip_suffix(last) else {
        return false;
    };

    for segment in interior.iter().filter(|s| !s.is_empty()) {
        match remaining.find(segment) {
            Some(idx) => remaining = &remaining[idx + segment.len()..],
            None => return false,
        }
    }
    true
}

/// True if any of `patterns` matches `literal`.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], literal: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), literal))
}
