//! Shape-preserving redaction of database statements and search request bodies.
//!
//! This crate turns a raw outgoing request into a low-cardinality value that is
//! safe to attach to a trace span:
//!
//! - **SQL text**: literal values become `?`, named parameters (`{name: Type}`)
//!   pass through, and the leading keyword becomes the operation name.
//! - **JSON bodies**: every scalar leaf becomes `"?"` while keys, key order,
//!   array lengths and nesting are kept.
//! - **ndjson batches**: each line is redacted on its own and the results are
//!   joined with `;`.
//!
//! What this crate does:
//! - redact statements and bodies with pure, synchronous functions
//! - derive the operation and namespace components of a span name
//! - bound the work done per call (input size, nesting depth, output length)
//!
//! What it does not do:
//! - intercept calls, create spans, or read request streams
//! - validate SQL or JSON beyond what redaction needs
//!
//! Every entry point is total: malformed or oversized input degrades the output
//! (absent, truncated, or partially redacted) and never fails the caller.
//!
//! ```rust
//! use statement_sanitizer::{Sanitizer, SanitizerConfig};
//!
//! let sanitizer = Sanitizer::new(SanitizerConfig::default());
//! let statement = sanitizer.sanitize_sql("select * from users where id = 42", Some("default"));
//!
//! assert_eq!(statement.sanitized(), Some("select * from users where id = ?"));
//! assert_eq!(statement.operation(), "SELECT");
//! assert_eq!(statement.namespace(), Some("default"));
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod config;
mod error;
pub mod json;
pub mod policy;
mod sanitizer;
#[cfg(feature = "slog")]
pub mod slog;
pub mod sql;
pub mod statement;
pub mod tracing;

pub use config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_LENGTH, DEFAULT_MAX_STATEMENT_LENGTH, SanitizerConfig,
};
pub use error::{SanitizeError, SourceFormat};
pub use json::{JsonNode, redact_json, redact_ndjson};
pub use policy::PLACEHOLDER;
pub use sanitizer::{BodyFormat, RequestBody, Sanitizer};
pub use sql::{SqlRedaction, redact_sql};
pub use statement::{OperationTarget, RawText, Statement};
