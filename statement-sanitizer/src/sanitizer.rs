//! Entry point held by the call interceptor.
//!
//! The interceptor builds one [`Sanitizer`] from its configuration and calls it
//! for every intercepted request. All methods are pure; a `Sanitizer` can be
//! shared across threads freely.

use tracing::{debug, trace};

use crate::{
    config::SanitizerConfig,
    error::SanitizeError,
    json::{redact_json_with, redact_ndjson_with},
    policy::truncate_chars,
    sql::{SqlRedaction, redact_sql_with},
    statement::{OperationTarget, RawText, Statement, request_summary},
};

/// How a request body should be redacted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyFormat {
    /// A single JSON document.
    Json,
    /// One JSON document per line.
    Ndjson,
    /// Anything else; the body is not captured.
    Unsupported,
}

impl BodyFormat {
    /// Picks a format from the declared content type.
    ///
    /// Without a declaration, or with a plain JSON one, the body decides: more
    /// than one non-empty line that is not a single pretty-printed document
    /// counts as ndjson. Batch endpoints often declare `application/json` for
    /// ndjson bodies.
    pub fn detect(content_type: Option<&str>, body: &str) -> Self {
        if let Some(content_type) = content_type {
            let content_type = content_type.to_ascii_lowercase();
            if content_type.contains("ndjson") {
                return Self::Ndjson;
            }
            if !content_type.contains("json") {
                return Self::Unsupported;
            }
        }

        let mut documents = body.lines().filter(|line| !line.trim().is_empty());
        match (documents.next(), documents.next()) {
            (Some(first), Some(_)) if is_complete_document(first) => Self::Ndjson,
            _ => Self::Json,
        }
    }
}

/// `true` when `line` holds a whole JSON document on its own.
fn is_complete_document(line: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(line).is_ok()
}

#[derive(Clone, Copy, Debug)]
enum Content<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

/// A request body the caller has already read, with its declared content type.
///
/// The sanitizer only borrows the body; it never reads from a stream.
#[derive(Clone, Copy, Debug)]
pub struct RequestBody<'a> {
    content: Content<'a>,
    content_type: Option<&'a str>,
}

impl<'a> RequestBody<'a> {
    pub fn text(body: &'a str) -> Self {
        Self {
            content: Content::Text(body),
            content_type: None,
        }
    }

    /// A body given as bytes; it must be UTF-8 to be captured.
    pub fn bytes(body: &'a [u8]) -> Self {
        Self {
            content: Content::Bytes(body),
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn content_type(&self) -> Option<&'a str> {
        self.content_type
    }

    /// The body as text.
    pub fn as_text(&self) -> Result<&'a str, SanitizeError> {
        match self.content {
            Content::Text(text) => Ok(text),
            Content::Bytes(bytes) => {
                std::str::from_utf8(bytes).map_err(|_| SanitizeError::InvalidEncoding)
            }
        }
    }
}

/// Produces [`Statement`]s under a fixed configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Redacts SQL text and caps the result at the configured statement length.
    pub fn redact_sql(&self, text: &str) -> SqlRedaction {
        let (sanitized, operation) = redact_sql_with(text, &self.config).into_parts();
        SqlRedaction::from_parts(self.cap(sanitized), operation)
    }

    /// Redacts a JSON body and caps the result at the configured statement length.
    pub fn redact_json(&self, body: &str) -> Option<String> {
        redact_json_with(body, &self.config).map(|sanitized| self.cap(sanitized))
    }

    /// Redacts a batch body and caps the result at the configured statement length.
    pub fn redact_ndjson(&self, body: &str) -> String {
        self.cap(redact_ndjson_with(body, &self.config))
    }

    /// Builds the statement for a SQL call.
    ///
    /// `namespace` is the database the client is configured with, if known.
    pub fn sanitize_sql(&self, text: &str, namespace: Option<&str>) -> Statement {
        let redaction = self.redact_sql(text);
        let target = OperationTarget::from_sql(&redaction, namespace);
        let sanitized = self
            .config
            .capture_statements()
            .then(|| redaction.into_parts().0);

        trace!(
            operation = target.operation(),
            captured = sanitized.is_some(),
            "sanitized SQL statement"
        );
        Statement::new(RawText::new(text), sanitized, target)
    }

    /// Builds the statement for a REST call to a search backend.
    ///
    /// The body is redacted according to [`BodyFormat::detect`]. A missing,
    /// empty or unsupported body yields `"<METHOD> <path>"` as the statement;
    /// a JSON or ndjson body that cannot be redacted yields no statement.
    pub fn sanitize_request(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<RequestBody<'_>>,
    ) -> Statement {
        let target = OperationTarget::from_request(method, endpoint);
        let summary = request_summary(method, endpoint);

        let text = match body.map(|body| body.as_text().map(|text| (text, body.content_type()))) {
            None => None,
            Some(Ok((text, _))) if text.trim().is_empty() => None,
            Some(Ok(readable)) => Some(readable),
            Some(Err(err)) => {
                debug!(kind = err.kind(), error = %err, "dropping request body from statement");
                return Statement::new(RawText::new(summary), None, target);
            }
        };

        let Some((text, content_type)) = text else {
            let sanitized = self.config.capture_statements().then(|| summary.clone());
            return Statement::new(RawText::new(summary), sanitized, target);
        };

        let raw = RawText::new(text);
        if !self.config.capture_statements() {
            return Statement::new(raw, None, target);
        }
        if text.len() > self.config.max_input_length() {
            let err = SanitizeError::SizeLimitExceeded {
                limit: self.config.max_input_length(),
                actual: text.len(),
            };
            debug!(kind = err.kind(), error = %err, "dropping request body from statement");
            return Statement::new(raw, None, target);
        }

        let sanitized = match BodyFormat::detect(content_type, text) {
            BodyFormat::Json => self.redact_json(text),
            BodyFormat::Ndjson => Some(self.redact_ndjson(text)).filter(|s| !s.is_empty()),
            BodyFormat::Unsupported => Some(self.cap(summary)),
        };

        trace!(
            operation = target.operation(),
            captured = sanitized.is_some(),
            "sanitized request body"
        );
        Statement::new(raw, sanitized, target)
    }

    fn cap(&self, sanitized: String) -> String {
        truncate_chars(sanitized, self.config.max_statement_length())
    }
}
