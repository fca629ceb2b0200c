//! Error types for TOON encoding, decoding, and LLM-adapter use.
//!
//! ## Error Categories
//!
//! - **Codec errors**: the named kinds a strict decode can fail with, each carrying
//!   the offending line number and content.
//! - **Type mismatches**: serde-bridge failures when decoded TOON doesn't fit a target type.
//! - **Adapter errors**: the LLM response couldn't be mapped onto declared output fields.
//! - **I/O errors**: reader/writer failures.
//!
//! The encoder itself never fails: unrepresentable values are normalized to `null`
//! before they ever reach the line writer.
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{from_str, Error};
//!
//! let result: Result<toon_codec::Value, Error> = from_str("fruits[3]: apple,banana");
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during TOON encoding, decoding,
/// or LLM-adapter formatting/parsing.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// A `kv-line` was expected but no unquoted colon was found.
    #[error("line {line_no}: missing colon: {content}")]
    MissingColon { line_no: usize, content: String },

    /// A quoted string was opened but never closed.
    #[error("line {line_no}: unterminated string: {content}")]
    UnterminatedString { line_no: usize, content: String },

    /// A backslash was followed by a character outside the escape alphabet.
    #[error("line {line_no}: invalid escape sequence: {content}")]
    InvalidEscape { line_no: usize, content: String },

    /// A braced field clause `{...}` was opened but never closed.
    #[error("line {line_no}: unterminated field clause: {content}")]
    UnterminatedFields { line_no: usize, content: String },

    /// An array body did not contain exactly the header-declared element count.
    #[error(
        "line {line_no}: length mismatch: header declares {expected}, found {found}: {content}"
    )]
    LengthMismatch {
        line_no: usize,
        content: String,
        expected: usize,
        found: usize,
    },

    /// A tabular row did not have exactly as many fields as the header clause.
    #[error(
        "line {line_no}: row width mismatch: header declares {expected} fields, row has {found}: {content}"
    )]
    RowWidthMismatch {
        line_no: usize,
        content: String,
        expected: usize,
        found: usize,
    },

    /// A blank line appeared inside an array body under strict decoding.
    #[error("line {line_no}: unexpected blank line inside array body")]
    UnexpectedBlank { line_no: usize, content: String },

    /// A line's indent was not a multiple of the configured indent size.
    #[error("line {line_no}: indent {found} is not a multiple of {expected}: {content}")]
    BadIndent {
        line_no: usize,
        content: String,
        expected: usize,
        found: usize,
    },

    /// The same key appeared twice within one object under strict decoding.
    #[error("line {line_no}: duplicate key {key:?}: {content}")]
    DuplicateKey {
        line_no: usize,
        content: String,
        key: String,
    },

    /// Type mismatch during serde-bridge deserialization.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A value could not be represented in TOON (serde-side, not value-normalizer side).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The LLM-adapter layer could not map a completion onto declared output fields.
    #[error("{0}")]
    Adapter(#[from] AdapterError),

    /// Custom error raised by a serde impl via `serde::ser::Error`/`serde::de::Error`.
    #[error("error: {0}")]
    Custom(String),

    /// Generic message, used sparingly.
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn missing_colon(line_no: usize, content: impl Into<String>) -> Self {
        Error::MissingColon {
            line_no,
            content: content.into(),
        }
    }

    pub fn unterminated_string(line_no: usize, content: impl Into<String>) -> Self {
        Error::UnterminatedString {
            line_no,
            content: content.into(),
        }
    }

    pub fn invalid_escape(line_no: usize, content: impl Into<String>) -> Self {
        Error::InvalidEscape {
            line_no,
            content: content.into(),
        }
    }

    pub fn unterminated_fields(line_no: usize, content: impl Into<String>) -> Self {
        Error::UnterminatedFields {
            line_no,
            content: content.into(),
        }
    }

    pub fn length_mismatch(
        line_no: usize,
        content: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Error::LengthMismatch {
            line_no,
            content: content.into(),
            expected,
            found,
        }
    }

    pub fn row_width_mismatch(
        line_no: usize,
        content: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Error::RowWidthMismatch {
            line_no,
            content: content.into(),
            expected,
            found,
        }
    }

    pub fn unexpected_blank(line_no: usize, content: impl Into<String>) -> Self {
        Error::UnexpectedBlank {
            line_no,
            content: content.into(),
        }
    }

    pub fn bad_indent(
        line_no: usize,
        content: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Error::BadIndent {
            line_no,
            content: content.into(),
            expected,
            found,
        }
    }

    pub fn duplicate_key(
        line_no: usize,
        content: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Error::DuplicateKey {
            line_no,
            content: content.into(),
            key: key.into(),
        }
    }

    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// True for the decoder's own syntax-level failures (line-numbered codec
    /// errors), as opposed to serde-bridge type mismatches or I/O failures.
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::MissingColon { .. }
                | Error::UnterminatedString { .. }
                | Error::InvalidEscape { .. }
                | Error::UnterminatedFields { .. }
                | Error::LengthMismatch { .. }
                | Error::RowWidthMismatch { .. }
                | Error::UnexpectedBlank { .. }
                | Error::BadIndent { .. }
                | Error::DuplicateKey { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Raised when the LLM-adapter layer exhausts every response-parsing fallback
/// and at least one declared output field is still missing.
#[derive(Debug, Clone, Error)]
#[error("adapter {adapter_name:?} failed to parse a response for signature {signature:?}")]
pub struct AdapterError {
    pub adapter_name: String,
    pub signature: String,
    pub lm_response: String,
    pub parsed_result: std::collections::BTreeMap<String, String>,
}

impl AdapterError {
    pub fn parse_failed(
        adapter_name: impl Into<String>,
        signature: impl Into<String>,
        lm_response: impl Into<String>,
        parsed_result: std::collections::BTreeMap<String, String>,
    ) -> Self {
        AdapterError {
            adapter_name: adapter_name.into(),
            signature: signature.into(),
            lm_response: lm_response.into(),
            parsed_result,
        }
    }
}
