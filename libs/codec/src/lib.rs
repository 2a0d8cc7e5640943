//! # Payline Protocol Codec
//!
//! ## Purpose
//!
//! The "rules" layer of the payline wire protocol: everything needed to turn
//! typed values into the byte-exact canonical form and back.
//!
//! - **Field registry** ([`field`]): the closed catalog of
//!   `(type_id, field_value, name, policy)` entries with the canonical total
//!   order record serialization relies on.
//! - **Serializer / deserializer** ([`serializer`]): big-endian primitive
//!   appends, self-describing length prefixes, 1-3 byte field tags, and the
//!   positional reader that inverts them.
//! - **Typed values** ([`value`]): the closed variant set (integers, hashes,
//!   blobs, accounts, amounts, hash vectors, path sets) with per-variant
//!   wire forms, default detection, equivalence, and text/JSON rendering.
//!
//! ## What This Crate Does NOT Contain
//!
//! - Value semantics and arithmetic (amounts, paths) — `payline-types`
//! - Record/transaction assembly and field ordering enforcement — the
//!   object layer above
//! - Transport, storage, or any I/O
//!
//! ## Integrity
//!
//! Producers build [`value::Value`]s, attach fields, and append to a
//! [`serializer::Serializer`]; consumers walk a buffer and reconstruct
//! values through the registry. Byte-exactness is load-bearing: two
//! implementations must hash identical bytes for identical values, so every
//! decoder here rejects non-canonical encodings instead of normalizing
//! them.

pub mod error;
pub mod field;
pub mod serializer;
pub mod value;

pub use error::{CodecError, CodecResult};
pub use field::{by_name, fields, generic, lookup, Field, FieldPolicy, FieldRef, TypeId};
pub use serializer::{Serializer, SerializerIterator, MAX_VL_LENGTH};
pub use value::Value;
