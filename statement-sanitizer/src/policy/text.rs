//! Placeholder and length capping for string values.
//!
//! Policies here are pure string transformations. They never inspect what the
//! text means; the redactors decide which spans count as literals.

/// Token substituted for every redacted literal.
///
/// SQL literals become a bare `?`; JSON scalars become the string `"?"`.
pub const PLACEHOLDER: &str = "?";

/// Returns the longest prefix of `value` that is at most `max_bytes` long and
/// ends on a `char` boundary.
///
/// The second element is `true` when the value was cut.
#[must_use]
pub fn cap_bytes(value: &str, max_bytes: usize) -> (&str, bool) {
    if value.len() <= max_bytes {
        return (value, false);
    }

    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    (&value[..end], true)
}

/// Keeps at most `max_chars` Unicode scalar values of `value`.
#[must_use]
pub fn truncate_chars(mut value: String, max_chars: usize) -> String {
    if let Some((end, _)) = value.char_indices().nth(max_chars) {
        value.truncate(end);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::{cap_bytes, truncate_chars};

    #[test]
    fn cap_bytes_keeps_short_values() {
        assert_eq!(cap_bytes("select 1", 64), ("select 1", false));
        assert_eq!(cap_bytes("", 0), ("", false));
    }

    #[test]
    fn cap_bytes_cuts_on_char_boundary() {
        // 'é' is two bytes; a cut at byte 2 would split it.
        assert_eq!(cap_bytes("aé", 2), ("a", true));
        assert_eq!(cap_bytes("aéb", 3), ("aé", true));
    }

    #[test]
    fn truncate_chars_counts_scalar_values() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("héllo".to_string(), 5), "héllo");
        assert_eq!(truncate_chars("héllo".to_string(), 9), "héllo");
        assert_eq!(truncate_chars("héllo".to_string(), 0), "");
    }
}
