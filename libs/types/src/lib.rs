//! # Payline Core Types
//!
//! Pure value types for the payline wire protocol. This crate holds the data
//! the protocol moves — fixed-width identifiers, canonical decimal amounts,
//! payment paths — and the arithmetic defined over them. It performs no I/O
//! and knows nothing about framing: the field-tagged wire encoding lives in
//! `payline-codec`, which consumes these types.
//!
//! ## What This Crate Contains
//!
//! - **Identifiers** ([`ids`]): 128/160/256-bit hashes, account ids, and
//!   currency ids with the three-letter human codec, all `repr(transparent)`
//!   zerocopy wrappers with compile-time zero/one constants.
//! - **Amounts** ([`amount`]): the unified native/issued decimal type with
//!   canonical form, total ordering per currency, and truncating or
//!   direction-rounded arithmetic on `u128` intermediates.
//! - **Rates and offers** ([`offer`]): packed 64-bit price encoding,
//!   transfer-rate fees in billionths, and the offer-crossing computation.
//! - **Paths** ([`paths`]): hop descriptors, paths, and path sets with
//!   canonicalization.
//!
//! ## Concurrency
//!
//! Everything here is plain data: no interior mutability, no locks, no
//! blocking. Immutable values share freely across threads; mutation needs
//! exclusive access, which the borrow checker already enforces.

pub mod amount;
pub mod errors;
pub mod ids;
pub mod offer;
pub mod paths;

pub use amount::{
    Amount, MAX_EXPONENT, MAX_MANTISSA, MAX_NATIVE, MAX_NATIVE_NETWORK, MIN_EXPONENT,
    MIN_MANTISSA, ZERO_EXPONENT,
};
pub use errors::AmountError;
pub use ids::{AccountId, Currency, Hash128, Hash160, Hash256, IdParseError};
pub use offer::{
    apply_offer, from_rate, get_pay, get_rate, set_rate, OfferCrossing, OfferSide, QUALITY_ONE,
    RATE_ONE,
};
pub use paths::{
    Path, PathElement, PathSet, HOP_ACCOUNT, HOP_CURRENCY, HOP_ISSUER, HOP_VALID_BITS,
    MAX_PATHS, MAX_PATH_ELEMENTS, PATH_BOUNDARY, PATH_END,
};
