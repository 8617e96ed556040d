//! Substitution and length policies shared by every redactor.
//!
//! This module provides:
//!
//! - **The placeholder** ([`PLACEHOLDER`]): the single token every literal scalar
//!   is replaced with, in SQL text and JSON bodies alike.
//! - **Length policies** (`text`): helpers that cap input and output sizes on
//!   Unicode scalar boundaries.
//!
//! # Example
//!
//! ```rust
//! use statement_sanitizer::{PLACEHOLDER, redact_json, redact_sql};
//!
//! assert_eq!(redact_sql("limit 10").sanitized(), format!("limit {PLACEHOLDER}"));
//! assert_eq!(redact_json("[1, true]").as_deref(), Some(r#"["?","?"]"#));
//! ```

pub mod text;

pub use text::{PLACEHOLDER, cap_bytes, truncate_chars};
