//! Literal redaction for SQL-like statement text.
//!
//! String literals (`'...'`, with `''` or `\'` as an escaped quote) and
//! numeric literals become `?`. Everything else is copied as written: keywords
//! keep their case, whitespace is untouched, and `{name: Type}` named
//! parameters and `$1` positional parameters pass through because they are
//! already placeholders.
//!
//! ```rust
//! use statement_sanitizer::redact_sql;
//!
//! let redaction = redact_sql("insert into t values('1')('2')('3')");
//! assert_eq!(redaction.sanitized(), "insert into t values(?)(?)(?)");
//! assert_eq!(redaction.operation(), "INSERT");
//! ```

mod lexer;

use tracing::debug;

use self::lexer::{Lexer, TokenKind};
use crate::{
    config::SanitizerConfig,
    error::{SanitizeError, SourceFormat},
    policy::{PLACEHOLDER, cap_bytes},
};

/// Result of redacting one statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlRedaction {
    sanitized: String,
    operation: String,
}

impl SqlRedaction {
    /// Statement text with every literal replaced by `?`.
    pub fn sanitized(&self) -> &str {
        &self.sanitized
    }

    /// Leading keyword, upper-cased (`SELECT`, `INSERT`, ...). Empty for empty text.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn into_parts(self) -> (String, String) {
        (self.sanitized, self.operation)
    }

    pub(crate) fn from_parts(sanitized: String, operation: String) -> Self {
        Self {
            sanitized,
            operation,
        }
    }
}

/// Redacts `text` with the default limits.
pub fn redact_sql(text: &str) -> SqlRedaction {
    redact_sql_with(text, &SanitizerConfig::default())
}

/// Redacts `text`, reading at most `config.max_input_length()` bytes of it.
///
/// Never fails. A quote or block comment that is opened and never closed
/// leaves the text from that point on unredacted; text before it is still
/// redacted. Output length is not capped here.
pub fn redact_sql_with(text: &str, config: &SanitizerConfig) -> SqlRedaction {
    let (input, cut) = cap_bytes(text, config.max_input_length());
    if cut {
        let err = SanitizeError::SizeLimitExceeded {
            limit: config.max_input_length(),
            actual: text.len(),
        };
        debug!(kind = err.kind(), error = %err, "redacting SQL prefix only");
    }

    let mut sanitized = String::with_capacity(input.len());
    let mut operation = None;
    let mut leading = true;

    for token in Lexer::new(input, cut) {
        let token = match token {
            Ok(token) => token,
            Err(unterminated) => {
                let err = SanitizeError::parse(SourceFormat::Sql, unterminated);
                debug!(kind = err.kind(), error = %err, "leaving SQL remainder unredacted");
                sanitized.push_str(&input[unterminated.start..]);
                break;
            }
        };

        if leading {
            match token.kind {
                TokenKind::Whitespace | TokenKind::Comment => {}
                TokenKind::Punctuation if token.text == "(" => {}
                TokenKind::Identifier if !token.is_quoted() => {
                    operation = Some(token.text.to_uppercase());
                    leading = false;
                }
                _ => leading = false,
            }
        }

        match token.kind {
            TokenKind::Literal => sanitized.push_str(PLACEHOLDER),
            _ => sanitized.push_str(token.text),
        }
    }

    // Taken from the sanitized text so a leading literal never becomes the operation.
    let operation = operation.unwrap_or_else(|| first_word(&sanitized));
    SqlRedaction {
        sanitized,
        operation,
    }
}

fn first_word(text: &str) -> String {
    text.split_whitespace()
        .next()
        .map(str::to_uppercase)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_groups_are_redacted_independently() {
        let redaction = redact_sql("insert into test_table values('1')('2')('3')");
        assert_eq!(redaction.sanitized(), "insert into test_table values(?)(?)(?)");
        assert_eq!(redaction.operation(), "INSERT");
    }

    #[test]
    fn numeric_limit_is_redacted() {
        let redaction = redact_sql("select * from test_table limit 1");
        assert_eq!(redaction.sanitized(), "select * from test_table limit ?");
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn named_parameter_passes_through() {
        let text = "select * from test_table where value={param_s: String}";
        let redaction = redact_sql(text);
        assert_eq!(redaction.sanitized(), text);
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn statement_without_literals_is_unchanged() {
        let text = "create table if not exists test_table(value String) engine=Memory";
        let redaction = redact_sql(text);
        assert_eq!(redaction.sanitized(), text);
        assert_eq!(redaction.operation(), "CREATE");
    }

    #[test]
    fn keyword_case_is_preserved_and_operation_upper_cased() {
        let redaction = redact_sql("SeLeCt a FROM b WHERE c = 'x'");
        assert_eq!(redaction.sanitized(), "SeLeCt a FROM b WHERE c = ?");
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn escaped_quotes_stay_inside_one_literal() {
        let redaction = redact_sql("update t set name = 'O''Brien', age = 42.5 where id = 7");
        assert_eq!(
            redaction.sanitized(),
            "update t set name = ?, age = ? where id = ?"
        );
        assert_eq!(redaction.operation(), "UPDATE");
    }

    #[test]
    fn backslash_escaped_quote_stays_inside_literal() {
        let redaction =
            redact_sql(r"select * from t where name = 'it\'s my secret password' and id = 1");
        assert_eq!(
            redaction.sanitized(),
            "select * from t where name = ? and id = ?"
        );
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn positional_parameters_pass_through() {
        let text = "select * from t where a = $1 and b in ($2, $10)";
        assert_eq!(redact_sql(text).sanitized(), text);
    }

    #[test]
    fn identifiers_with_digits_are_kept() {
        let redaction = redact_sql("select c1, t2.col_3 from t1 where x = 10");
        assert_eq!(
            redaction.sanitized(),
            "select c1, t2.col_3 from t1 where x = ?"
        );
    }

    #[test]
    fn quoted_identifiers_and_comments_are_kept() {
        let redaction =
            redact_sql("/* lookup */ select \"user id\" from `t` -- id = 5\nwhere id = 5");
        assert_eq!(
            redaction.sanitized(),
            "/* lookup */ select \"user id\" from `t` -- id = 5\nwhere id = ?"
        );
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn operation_skips_leading_parentheses() {
        assert_eq!(redact_sql("  (select 1) union (select 2)").operation(), "SELECT");
    }

    #[test]
    fn empty_text_has_empty_operation() {
        let redaction = redact_sql("");
        assert_eq!(redaction.sanitized(), "");
        assert_eq!(redaction.operation(), "");
        assert_eq!(redact_sql("   ").operation(), "");
    }

    #[test]
    fn leading_literal_does_not_leak_into_operation() {
        let redaction = redact_sql("'secret' as x");
        assert_eq!(redaction.sanitized(), "? as x");
        assert_eq!(redaction.operation(), "?");
    }

    #[test]
    fn unmatched_quote_leaves_remainder_unredacted() {
        let redaction = redact_sql("select 1, 'abc from t");
        assert_eq!(redaction.sanitized(), "select ?, 'abc from t");
        assert_eq!(redaction.operation(), "SELECT");
    }

    #[test]
    fn unmatched_quote_at_start_returns_input() {
        let redaction = redact_sql("'abc def");
        assert_eq!(redaction.sanitized(), "'abc def");
        assert_eq!(redaction.operation(), "'ABC");
    }

    #[test]
    fn redaction_is_idempotent() {
        for text in [
            "insert into test_table values('1')('2')('3')",
            "select * from test_table limit 1",
            "select * from test_table where value={param_s: String}",
            "select 1, 'abc from t",
            "select -1.5e3, 0xFF, 'a''b' from t where x in (1, 2, 3)",
            r"select 'it\'s', 'c:\\' from t where id = $1",
            "",
        ] {
            let once = redact_sql(text);
            let twice = redact_sql(once.sanitized());
            assert_eq!(once, twice, "{text}");
        }
    }

    #[test]
    fn oversized_input_redacts_prefix_only() {
        let config = SanitizerConfig::default().with_max_input_length(24);
        let redaction = redact_sql_with("select * from t where name = 'very long value'", &config);
        assert_eq!(redaction.sanitized(), "select * from t where na");

        let config = SanitizerConfig::default().with_max_input_length(34);
        let redaction = redact_sql_with("select * from t where name = 'very long value'", &config);
        assert_eq!(redaction.sanitized(), "select * from t where name = ?");
    }
}
