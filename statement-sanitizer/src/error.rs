//! Error kinds raised inside the redactors.
//!
//! None of these ever reach the instrumented call. The fallible `try_*`
//! functions return them so the total entry points can pick a fallback and
//! log which one was taken.

use std::fmt;

use thiserror::Error;

/// Input format a parse failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Sql,
    Json,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql => f.write_str("SQL"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Why a redactor fell back instead of producing a fully redacted value.
///
/// Messages never contain input text, only positions and sizes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// The input was absent, empty, or whitespace only.
    #[error("empty input")]
    EmptyInput,
    /// The input is larger than the configured bound.
    #[error("input of {actual} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { limit: usize, actual: usize },
    /// The JSON document nests deeper than the configured bound.
    #[error("nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    /// A request body was handed over as bytes that are not UTF-8.
    #[error("request body is not valid UTF-8")]
    InvalidEncoding,
    /// The input could not be parsed.
    #[error("malformed {format}: {reason}")]
    ParseFailure { format: SourceFormat, reason: String },
}

impl SanitizeError {
    pub(crate) fn parse(format: SourceFormat, reason: impl fmt::Display) -> Self {
        Self::ParseFailure {
            format,
            reason: reason.to_string(),
        }
    }

    /// Short, stable name of the error kind for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::SizeLimitExceeded { .. } => "size_limit_exceeded",
            Self::DepthLimitExceeded { .. } => "depth_limit_exceeded",
            Self::InvalidEncoding => "invalid_encoding",
            Self::ParseFailure { .. } => "parse_failure",
        }
    }
}
