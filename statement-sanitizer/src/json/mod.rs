//! Shape-preserving redaction of JSON request bodies.
//!
//! A body is parsed into a [`JsonNode`] tree in which every string, number,
//! boolean and null leaf collapses into [`JsonNode::Scalar`] while it is being
//! read, so raw leaf values never live in the tree. Serializing the tree
//! renders each scalar as `"?"`, keeps keys and their order, and emits compact
//! JSON.
//!
//! ```rust
//! use statement_sanitizer::redact_json;
//!
//! let body = r#"{"query":{"match":{"message":{"query":"test"}}}}"#;
//! assert_eq!(
//!     redact_json(body).as_deref(),
//!     Some(r#"{"query":{"match":{"message":{"query":"?"}}}}"#)
//! );
//! assert_eq!(redact_json("{not valid json"), None);
//! ```

mod ndjson;
mod node;

use tracing::debug;

pub use self::ndjson::{DOCUMENT_SEPARATOR, redact_ndjson, redact_ndjson_with};
pub use self::node::JsonNode;
use crate::{config::SanitizerConfig, error::SanitizeError};

/// Redacts `body` with the default limits.
///
/// Returns `None` when the body is empty, malformed, too deep or too large.
pub fn redact_json(body: &str) -> Option<String> {
    redact_json_with(body, &SanitizerConfig::default())
}

/// Redacts `body` under the limits in `config`.
///
/// Failures are logged at `debug` level by kind and never carry the body.
pub fn redact_json_with(body: &str, config: &SanitizerConfig) -> Option<String> {
    match try_redact_json(body, config) {
        Ok(sanitized) => Some(sanitized),
        Err(err) => {
            debug!(kind = err.kind(), error = %err, "dropping JSON body from statement");
            None
        }
    }
}

/// Fallible form of [`redact_json_with`].
pub fn try_redact_json(body: &str, config: &SanitizerConfig) -> Result<String, SanitizeError> {
    if body.trim().is_empty() {
        return Err(SanitizeError::EmptyInput);
    }
    if body.len() > config.max_input_length() {
        return Err(SanitizeError::SizeLimitExceeded {
            limit: config.max_input_length(),
            actual: body.len(),
        });
    }

    let node = JsonNode::parse(body, config.max_depth())?;
    Ok(node.to_json())
}
