//! Newline-delimited batch bodies (`_msearch`, `_bulk`).
//!
//! Each line is an independent JSON document. Lines are redacted one at a time
//! and joined with `;`.

use tracing::debug;

use super::redact_json_with;
use crate::{config::SanitizerConfig, error::SanitizeError};

/// Separator between redacted documents.
pub const DOCUMENT_SEPARATOR: char = ';';

/// Redacts a batch body with the default limits.
pub fn redact_ndjson(body: &str) -> String {
    redact_ndjson_with(body, &SanitizerConfig::default())
}

/// Redacts each line of `body` and joins the results with `;`.
///
/// A single trailing empty line is dropped, so a body ending in a newline has
/// no extra document. A line that cannot be redacted contributes an empty
/// segment and the remaining lines are still redacted. A body over
/// `config.max_input_length()` yields an empty string.
pub fn redact_ndjson_with(body: &str, config: &SanitizerConfig) -> String {
    if body.len() > config.max_input_length() {
        let err = SanitizeError::SizeLimitExceeded {
            limit: config.max_input_length(),
            actual: body.len(),
        };
        debug!(kind = err.kind(), error = %err, "dropping batch body from statement");
        return String::new();
    }

    let mut lines: Vec<&str> = body.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let mut sanitized = String::with_capacity(body.len());
    for (index, line) in lines.into_iter().enumerate() {
        if index > 0 {
            sanitized.push(DOCUMENT_SEPARATOR);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(document) = redact_json_with(line, config) {
            sanitized.push_str(&document);
        }
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_query_lines_are_joined() {
        let body = "{\"index\":\"test-search-index\"}\n{\"query\":{\"term\":{\"message\":{\"value\":\"message\"}}}}\n";
        assert_eq!(
            redact_ndjson(body),
            r#"{"index":"?"};{"query":{"term":{"message":{"value":"?"}}}}"#
        );
    }

    #[test]
    fn only_one_trailing_empty_line_is_dropped() {
        assert_eq!(redact_ndjson("{\"a\":1}\n"), r#"{"a":"?"}"#);
        assert_eq!(redact_ndjson("{\"a\":1}\n\n"), r#"{"a":"?"};"#);
        assert_eq!(redact_ndjson(""), "");
    }

    #[test]
    fn malformed_line_leaves_empty_segment() {
        assert_eq!(
            redact_ndjson("{\"a\":1}\n{oops\n[true]"),
            r#"{"a":"?"};;["?"]"#
        );
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        assert_eq!(redact_ndjson("{\"a\":1}\r\n{\"b\":2}\r\n"), r#"{"a":"?"};{"b":"?"}"#);
    }

    #[test]
    fn oversized_batch_is_dropped() {
        let config = SanitizerConfig::default().with_max_input_length(4);
        assert_eq!(redact_ndjson_with("{\"a\":1}\n", &config), "");
    }
}
