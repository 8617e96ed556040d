//! Adapters for emitting statements through `slog`.
//!
//! This module exists to log a [`Statement`] with `slog` without ever
//! serializing its raw text:
//! - as a `slog::Value`, a statement emits its sanitized text, or `None` when
//!   nothing was captured
//! - as a `slog::KV`, it emits `db.operation`, `db.namespace` and
//!   `db.statement`
//!
//! It does not configure `slog` or decide what gets redacted.

use slog::{KV, Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::statement::{
    Statement,
    attributes::{DB_NAMESPACE, DB_OPERATION, DB_STATEMENT},
};

impl SlogValue for Statement {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        match self.sanitized() {
            Some(sanitized) => serializer.emit_str(key, sanitized),
            None => serializer.emit_none(key),
        }
    }
}

impl KV for Statement {
    fn serialize(&self, _record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        serializer.emit_str(DB_OPERATION, self.operation())?;
        if let Some(namespace) = self.namespace() {
            serializer.emit_str(DB_NAMESPACE, namespace)?;
        }
        match self.sanitized() {
            Some(sanitized) => serializer.emit_str(DB_STATEMENT, sanitized),
            None => serializer.emit_none(DB_STATEMENT),
        }
    }
}
