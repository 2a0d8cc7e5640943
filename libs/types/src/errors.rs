//! Error types for canonical amount arithmetic
//!
//! Every fallible amount operation surfaces one of these kinds to the
//! caller; nothing is retried or silently clamped inside this layer.

use thiserror::Error;

/// Failures of amount construction, canonicalization and arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Canonicalization or arithmetic left the representable band
    /// (mantissa/exponent range for issued values, the native cap for
    /// native values).
    #[error("amount out of representable range")]
    Overflow,

    /// Binary operation on amounts that are not mutually comparable
    /// (native vs issued, or different issued currencies).
    #[error("amounts are not comparable: {lhs} vs {rhs}")]
    TypeMismatch { lhs: String, rhs: String },

    /// Division by an amount with zero mantissa.
    #[error("division by a zero amount")]
    DivideByZero,

    /// A native-only accessor was called on an issued amount.
    #[error("operation requires a native amount")]
    NotNative,

    /// The reserved ASCII-"XRP" currency pattern cannot denominate an
    /// issued amount.
    #[error("reserved currency id cannot denominate an issued amount")]
    ReservedCurrency,
}
