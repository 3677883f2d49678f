//! Error types shared by the parse and serialize paths.
//!
//! Parsing is all or nothing: any error aborts the current top-level parse
//! and no partial value is returned. [`ParseError::Validation`] is the
//! semantic sub-kind (cardinality violated, integer width unmapped, ...)
//! while the other variants describe malformed or truncated input.

use thiserror::Error;

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for serialize operations
pub type SerializeResult<T> = Result<T, SerializationError>;

/// Errors raised while reading values from a [`ReadBuffer`](crate::io::ReadBuffer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The buffer ended before the requested number of bits could be read
    #[error("unexpected end of data at bit {pos}: needed {needed} bits, {available} available")]
    UnexpectedEndOfData {
        pos: usize,
        needed: usize,
        available: usize,
    },

    /// A discriminator did not map to any variant of a closed family
    #[error("Unsupported case for discriminated type {family}: {discriminator}")]
    UnsupportedCase {
        family: &'static str,
        discriminator: String,
    },

    /// A structural expectation failed (wrong tag number, wrong tag type).
    /// Implicitly optional fields treat this as "field absent".
    #[error("assertion failed for {field}: {message}")]
    AssertMismatch {
        field: &'static str,
        message: String,
    },

    /// A semantic post-condition failed
    #[error("validation failed: {0}")]
    Validation(String),

    /// Constructed values nest deeper than the configured limit
    #[error("nesting depth {depth} exceeds the configured maximum")]
    NestingTooDeep { depth: usize },
}

impl ParseError {
    pub(crate) fn unsupported(family: &'static str, discriminator: impl ToString) -> Self {
        ParseError::UnsupportedCase {
            family,
            discriminator: discriminator.to_string(),
        }
    }

    pub(crate) fn mismatch(field: &'static str, message: impl Into<String>) -> Self {
        ParseError::AssertMismatch {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ParseError::Validation(message.into())
    }

    /// Whether this is a semantic validation failure rather than malformed input
    pub fn is_validation(&self) -> bool {
        matches!(self, ParseError::Validation(_))
    }

    /// Whether an implicitly optional field may treat this error as "absent"
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            ParseError::AssertMismatch { .. } | ParseError::UnexpectedEndOfData { .. }
        )
    }
}

/// Errors raised while writing values to a [`WriteBuffer`](crate::io::WriteBuffer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// A value does not fit in the bit width reserved for it
    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { bits: u8, value: i128 },

    /// A structural invariant of the value being written does not hold
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Constructed values nest deeper than the configured limit
    #[error("nesting depth {depth} exceeds the configured maximum")]
    NestingTooDeep { depth: usize },
}

impl SerializationError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        SerializationError::Invariant(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_parse_error_sub_kind() {
        let err = ParseError::validation("stateChangeValues should have exactly 7 values");
        assert!(err.is_validation());
        assert!(!err.is_absence());
        assert_eq!(
            err.to_string(),
            "validation failed: stateChangeValues should have exactly 7 values"
        );
    }

    #[test]
    fn test_absence_errors() {
        let eof = ParseError::UnexpectedEndOfData {
            pos: 8,
            needed: 8,
            available: 0,
        };
        assert!(eof.is_absence());
        assert!(ParseError::mismatch("tagNumber", "tagnumber doesn't match").is_absence());
        assert!(!ParseError::unsupported("FaultParameter", 9).is_absence());
    }

    #[test]
    fn test_unsupported_case_message() {
        let err = ParseError::unsupported("ConfirmedServiceRequest", "choice 0x63");
        assert_eq!(
            err.to_string(),
            "Unsupported case for discriminated type ConfirmedServiceRequest: choice 0x63"
        );
    }
}
