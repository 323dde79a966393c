//! Wildcard channel-name matching.
//!
//! A channel pattern `P` is the parent of a channel `C` iff `P == C`, or
//! `P` ends in `*` and `C` starts with `P` minus its trailing `*`. Only a
//! single trailing wildcard is supported; there is no mid-string or
//! multi-segment glob.

/// True if `pattern` matches `channel` under the bus's wildcard rule.
///
/// # Example
/// ```rust
/// use universe_rt::bus::pattern::matches;
///
/// assert!(matches("a/*", "a/b"));
/// assert!(matches("a/*", "a/b/c"));
/// assert!(!matches("a/*", "b/x"));
/// assert!(matches("a/b", "a/b"));
/// assert!(!matches("a/b", "a/bc"));
/// ```
pub fn matches(pattern: &str, channel: &str) -> bool {
    if pattern == channel {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => channel.starts_with(prefix),
        None => false,
    }
}

/// True if `channel` is under the `local/` namespace, which the bus never
/// forwards across a [`crate::remote`] connection.
pub fn is_local_only(channel: &str) -> bool {
    channel.starts_with("local/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("a/b", "a/b"));
    }

    #[test]
    fn test_exact_mismatch() {
        assert!(!matches("a/b", "a/c"));
    }

    #[test]
    fn test_wildcard_matches_direct_child() {
        assert!(matches("a/*", "a/b"));
    }

    #[test]
    fn test_wildcard_matches_deep_descendant() {
        assert!(matches("a/*", "a/b/c"));
    }

    #[test]
    fn test_wildcard_does_not_match_sibling() {
        assert!(!matches("a/*", "b/x"));
    }

    #[test]
    fn test_wildcard_does_not_match_prefix_collision() {
        // "ab" starts with "a" but is not under the "a/" hierarchy.
        assert!(!matches("a/*", "ab"));
    }

    #[test]
    fn test_non_wildcard_does_not_match_substring() {
        assert!(!matches("a/b", "a/bc"));
    }

    #[test]
    fn test_local_namespace_detection() {
        assert!(is_local_only("local/metrics"));
        assert!(!is_local_only("race/flight"));
    }
}
