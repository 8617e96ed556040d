//! Adapters for emitting statements through `tracing`.
//!
//! - **`SpanStatementExt`**: records the sanitized statement, operation and
//!   namespace on a span that declared the matching fields.
//! - **`TracingStatementExt`**: logs the sanitized statement as a display value.
//!
//! Neither adapter ever reads [`Statement::raw`].
//!
//! # Example
//!
//! ```rust
//! use statement_sanitizer::{
//!     Sanitizer,
//!     tracing::{SpanStatementExt, TracingStatementExt},
//! };
//!
//! let statement = Sanitizer::default().sanitize_sql("select * from t limit 1", Some("default"));
//!
//! let span = tracing::info_span!(
//!     "query",
//!     db.statement = tracing::field::Empty,
//!     db.operation = tracing::field::Empty,
//!     db.namespace = tracing::field::Empty,
//! );
//! span.record_statement(&statement);
//!
//! tracing::debug!(statement = statement.tracing_statement(), "issued query");
//! ```

use tracing::{
    Span,
    field::{DisplayValue, display},
};

use crate::statement::{
    Statement,
    attributes::{DB_NAMESPACE, DB_OPERATION, DB_STATEMENT},
};

/// Extension trait for recording a [`Statement`] on a span.
pub trait SpanStatementExt {
    /// Records `db.statement`, `db.operation` and `db.namespace`.
    ///
    /// Absent components are left unrecorded, and `tracing` ignores fields the
    /// span did not declare.
    fn record_statement(&self, statement: &Statement) -> &Self;
}

impl SpanStatementExt for Span {
    fn record_statement(&self, statement: &Statement) -> &Self {
        self.record(DB_OPERATION, statement.operation());
        if let Some(namespace) = statement.namespace() {
            self.record(DB_NAMESPACE, namespace);
        }
        if let Some(sanitized) = statement.sanitized() {
            self.record(DB_STATEMENT, sanitized);
        }
        self
    }
}

/// Extension trait for logging the sanitized text as a display value.
pub trait TracingStatementExt {
    /// The sanitized statement, or an empty string when none was captured.
    fn tracing_statement(&self) -> DisplayValue<&str>;
}

impl TracingStatementExt for Statement {
    fn tracing_statement(&self) -> DisplayValue<&str> {
        display(self.sanitized().unwrap_or_default())
    }
}
