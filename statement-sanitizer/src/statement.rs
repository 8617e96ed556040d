//! The value handed back to the instrumentation layer.
//!
//! A [`Statement`] pairs the sanitized text with the two span-name
//! components: the operation verb and the namespace it targets. Composing
//! `"<operation> <namespace>"` is left to the caller.

use std::fmt;

use crate::sql::SqlRedaction;

/// Attribute keys following OpenTelemetry database semantic conventions.
pub mod attributes {
    /// Sanitized statement or request body.
    pub const DB_STATEMENT: &str = "db.statement";
    /// Operation verb (`SELECT`, `POST`, ...).
    pub const DB_OPERATION: &str = "db.operation";
    /// Database or index the statement targets.
    pub const DB_NAMESPACE: &str = "db.namespace";
}

/// The unredacted input a statement was built from.
///
/// `Debug` prints only the length. Read the text with [`RawText::expose`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawText(String);

impl RawText {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Explicitly access the raw text.
    ///
    /// This text may contain credentials or personal data; never attach it to
    /// telemetry.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RawText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawText({} bytes)", self.0.len())
    }
}

/// Operation verb and target namespace of one intercepted call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationTarget {
    operation: String,
    namespace: Option<String>,
}

impl OperationTarget {
    /// Pairs the operation parsed from a statement with the caller's default database.
    pub fn from_sql(redaction: &SqlRedaction, namespace: Option<&str>) -> Self {
        Self {
            operation: redaction.operation().to_string(),
            namespace: non_empty(namespace),
        }
    }

    /// Derives the target of a REST call from its method and endpoint.
    ///
    /// The namespace is the first path segment when it names an index; paths
    /// whose first segment starts with `_` (`_cluster/health`, `_msearch`)
    /// have none.
    ///
    /// ```rust
    /// use statement_sanitizer::OperationTarget;
    ///
    /// let target = OperationTarget::from_request("post", "/logs-2024/_search?size=10");
    /// assert_eq!(target.operation(), "POST");
    /// assert_eq!(target.namespace(), Some("logs-2024"));
    ///
    /// let target = OperationTarget::from_request("GET", "_cluster/health");
    /// assert_eq!(target.namespace(), None);
    /// ```
    pub fn from_request(method: &str, endpoint: &str) -> Self {
        let index = endpoint_path(endpoint)
            .split('/')
            .next()
            .filter(|segment| !segment.is_empty() && !segment.starts_with('_'));
        Self {
            operation: method.trim().to_uppercase(),
            namespace: index.map(str::to_string),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// A sanitized statement and its span-name components.
///
/// `sanitized` is `None` when capture is disabled or when the input could not
/// be redacted; the span should then carry no statement attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    raw: RawText,
    sanitized: Option<String>,
    target: OperationTarget,
}

impl Statement {
    pub(crate) fn new(raw: RawText, sanitized: Option<String>, target: OperationTarget) -> Self {
        Self {
            raw,
            sanitized,
            target,
        }
    }

    pub fn raw(&self) -> &RawText {
        &self.raw
    }

    pub fn sanitized(&self) -> Option<&str> {
        self.sanitized.as_deref()
    }

    pub fn operation(&self) -> &str {
        self.target.operation()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.target.namespace()
    }

    pub fn target(&self) -> &OperationTarget {
        &self.target
    }
}

/// Endpoint path without scheme, authority, leading `/`, query or fragment.
pub(crate) fn endpoint_path(endpoint: &str) -> &str {
    let endpoint = endpoint.trim();
    let path = match endpoint.find("://") {
        Some(scheme_end) => {
            let after = &endpoint[scheme_end + 3..];
            after.find('/').map_or("", |slash| &after[slash..])
        }
        None => endpoint,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_start_matches('/')
}

/// `"<METHOD> <path>"`, used when a request has no capturable body.
pub(crate) fn request_summary(method: &str, endpoint: &str) -> String {
    format!("{} {}", method.trim().to_uppercase(), endpoint_path(endpoint))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::redact_sql;

    #[test]
    fn sql_target_uses_default_database() {
        let target = OperationTarget::from_sql(&redact_sql("select 1"), Some("default"));
        assert_eq!(target.operation(), "SELECT");
        assert_eq!(target.namespace(), Some("default"));
    }

    #[test]
    fn blank_namespace_is_absent() {
        let target = OperationTarget::from_sql(&redact_sql("select 1"), Some("  "));
        assert_eq!(target.namespace(), None);
    }

    #[test]
    fn request_target_reads_index_segment() {
        let target = OperationTarget::from_request("POST", "test-search-index/_search");
        assert_eq!(target.operation(), "POST");
        assert_eq!(target.namespace(), Some("test-search-index"));

        let target = OperationTarget::from_request("PUT", "/test-search-index");
        assert_eq!(target.namespace(), Some("test-search-index"));
    }

    #[test]
    fn underscore_endpoints_have_no_namespace() {
        for endpoint in ["_cluster/health", "_msearch", "/_bulk", ""] {
            assert_eq!(
                OperationTarget::from_request("GET", endpoint).namespace(),
                None,
                "{endpoint}"
            );
        }
    }

    #[test]
    fn endpoint_path_strips_url_parts() {
        assert_eq!(endpoint_path("http://localhost:9200/idx/_doc?refresh=true"), "idx/_doc");
        assert_eq!(endpoint_path("https://host"), "");
        assert_eq!(endpoint_path("/_cluster/health#frag"), "_cluster/health");
    }

    #[test]
    fn summary_joins_method_and_path() {
        assert_eq!(request_summary("get", "/_cluster/health?pretty"), "GET _cluster/health");
    }

    #[test]
    fn raw_text_debug_hides_content() {
        let raw = RawText::new("select 'secret'");
        assert_eq!(format!("{raw:?}"), "RawText(15 bytes)");
        assert_eq!(raw.expose(), "select 'secret'");
    }
}
