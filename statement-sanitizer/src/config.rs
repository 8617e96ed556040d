//! Configuration read once when the host instrumenter is constructed.

use serde::Deserialize;

/// Default cap on the sanitized statement, in Unicode scalar values.
pub const DEFAULT_MAX_STATEMENT_LENGTH: usize = 4096;

/// Default cap on the raw input handed to a redactor, in bytes.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 1024 * 1024;

/// Default cap on JSON nesting (objects and arrays).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits and switches applied to every redaction call.
///
/// Use [`SanitizerConfig::default`] and the `with_*` methods to build one, or
/// deserialize it from the host's configuration source; missing keys take
/// their defaults.
///
/// ```rust
/// use statement_sanitizer::SanitizerConfig;
///
/// let config = SanitizerConfig::default()
///     .with_max_statement_length(256)
///     .with_max_depth(16);
/// assert!(config.capture_statements());
/// assert_eq!(config.max_statement_length(), 256);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Whether sanitized statements are produced at all.
    capture_statements: bool,
    /// Maximum length of the sanitized output, in chars.
    max_statement_length: usize,
    /// Maximum length of the raw input, in bytes.
    max_input_length: usize,
    /// Maximum JSON nesting depth.
    max_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            capture_statements: true,
            max_statement_length: DEFAULT_MAX_STATEMENT_LENGTH,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SanitizerConfig {
    /// A configuration that never produces statement text.
    ///
    /// Operation and namespace are still extracted.
    #[must_use]
    pub fn capture_disabled() -> Self {
        Self::default().with_capture_statements(false)
    }

    /// Enables or disables statement capture.
    #[must_use]
    pub fn with_capture_statements(mut self, enabled: bool) -> Self {
        self.capture_statements = enabled;
        self
    }

    /// Caps the sanitized output at `max_chars` Unicode scalar values.
    #[must_use]
    pub fn with_max_statement_length(mut self, max_chars: usize) -> Self {
        self.max_statement_length = max_chars;
        self
    }

    /// Caps the raw input at `max_bytes`.
    #[must_use]
    pub fn with_max_input_length(mut self, max_bytes: usize) -> Self {
        self.max_input_length = max_bytes;
        self
    }

    /// Caps JSON nesting at `max_depth` containers.
    ///
    /// `serde_json` enforces its own recursion limit of 128, so larger values
    /// behave like 128.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn capture_statements(&self) -> bool {
        self.capture_statements
    }

    pub fn max_statement_length(&self) -> usize {
        self.max_statement_length
    }

    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_capture() {
        let config = SanitizerConfig::default();
        assert!(config.capture_statements());
        assert_eq!(config.max_statement_length(), DEFAULT_MAX_STATEMENT_LENGTH);
        assert_eq!(config.max_input_length(), DEFAULT_MAX_INPUT_LENGTH);
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn capture_disabled_keeps_limits() {
        let config = SanitizerConfig::capture_disabled();
        assert!(!config.capture_statements());
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn deserializes_with_missing_keys_defaulted() {
        let config: SanitizerConfig =
            serde_json::from_str(r#"{"capture_statements":false,"max_statement_length":128}"#)
                .unwrap();
        assert!(!config.capture_statements());
        assert_eq!(config.max_statement_length(), 128);
        assert_eq!(config.max_input_length(), DEFAULT_MAX_INPUT_LENGTH);
    }
}
