//! Protocol-level errors for wire encoding and decoding
//!
//! Each variant carries the context needed to diagnose the failure without
//! re-parsing the buffer: offsets, observed lengths and tags, and the bound
//! that was violated. Deserialization failures never leave a partial value
//! visible to the caller.

use payline_types::AmountError;
use thiserror::Error;

/// Failures of the serializer, deserializer and typed-value dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer underrun: a read ran past the end of the input.
    #[error("truncated input: need {need} bytes at offset {offset}, {remaining} remaining")]
    TruncatedInput {
        need: usize,
        offset: usize,
        remaining: usize,
    },

    /// A variable-length payload exceeds the encodable maximum.
    #[error("variable-length payload of {len} bytes exceeds maximum {max}")]
    InvalidLength { len: usize, max: usize },

    /// The first byte of a length prefix is not a legal range marker.
    #[error("invalid length prefix byte {prefix:#04x}")]
    BadLengthPrefix { prefix: u8 },

    /// A field tag that cannot be encoded, or a non-canonical tag on the
    /// wire (extension byte below 16 or zero component).
    #[error("malformed field tag: type {type_id}, field {field_value}")]
    BadFieldId { type_id: u16, field_value: u16 },

    /// A well-formed field tag naming no field in the registry.
    #[error("unknown field: type {type_id}, field {field_value}")]
    UnknownField { type_id: u16, field_value: u16 },

    /// Amount wire form violating the canonical invariants: reserved bits,
    /// out-of-band mantissa or exponent, a forbidden currency id.
    #[error("malformed amount: {reason}")]
    MalformedAmount { reason: String },

    /// Path framing violation: invalid mask bits, an empty path, or a path
    /// beyond the element limit.
    #[error("malformed path: {reason}")]
    MalformedPath { reason: String },

    /// An account payload of the wrong width.
    #[error("account payload must be 20 bytes, got {len}")]
    MalformedAccount { len: usize },

    /// A hash-vector payload that is not a whole number of 256-bit hashes.
    #[error("hash vector payload of {len} bytes is not a multiple of 32")]
    MalformedVector { len: usize },

    /// Amount arithmetic or canonicalization failure surfaced through the
    /// codec.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Result alias used throughout the codec.
pub type CodecResult<T> = Result<T, CodecError>;
