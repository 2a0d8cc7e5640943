//! # Typed wire values
//!
//! ## Purpose
//!
//! The closed set of value variants the protocol exchanges, as a tagged sum.
//! Each variant owns its payload and carries a `&'static` reference to its
//! field identity, so ordinary value copies preserve the field — polymorphic
//! ownership through a base class becomes exhaustive match on the tag.
//!
//! ## Wire forms
//!
//! | variant | encoding |
//! |---|---|
//! | integers | big-endian at their width |
//! | hashes | raw bytes (16/20/32) |
//! | blob | length prefix + bytes |
//! | account | as blob, exactly 20 bytes |
//! | amount | 8 bytes native, 48 bytes issued |
//! | hash vector | length prefix + 32-byte concatenation |
//! | path set | in-band framed hop stream |
//!
//! Producers attach values to fields and call [`Value::serialize`];
//! consumers walk a buffer with [`Value::read`], which reads the field tag,
//! resolves it in the registry, and dispatches on the field's type id.
//! A failed read never yields a partial value.
//!
//! ## Amount header word
//!
//! Bit 63 set means issued; bit 62 is the positive flag. Issued amounts pack
//! `exponent + 97` into bits 61..54 over the 54-bit mantissa, then append
//! currency and issuer. Native amounts are the mantissa alone (under bit
//! 62); an issued zero is bit 63 alone. Decoding enforces the canonical
//! band and rejects the reserved currency.

use crate::error::{CodecError, CodecResult};
use crate::field::{self, FieldRef, TypeId};
use crate::serializer::{Serializer, SerializerIterator};
use payline_types::amount::{MAX_EXPONENT, MAX_MANTISSA, MAX_NATIVE, MIN_EXPONENT, MIN_MANTISSA};
use payline_types::paths::{
    Path, PathElement, PathSet, HOP_ACCOUNT, HOP_CURRENCY, HOP_ISSUER, HOP_VALID_BITS, MAX_PATHS,
    MAX_PATH_ELEMENTS, PATH_BOUNDARY, PATH_END,
};
use payline_types::{AccountId, Amount, Currency, Hash128, Hash160, Hash256};
use serde_json::json;
use tracing::warn;

/// Bit 63 of the amount header: set iff issued.
const AMOUNT_NOT_NATIVE: u64 = 0x8000_0000_0000_0000;
/// Bit 62 of the amount header: set iff non-negative.
const AMOUNT_POSITIVE: u64 = 0x4000_0000_0000_0000;
/// Mask of the 54 mantissa bits of an issued amount header.
const AMOUNT_MANTISSA_MASK: u64 = (1 << 54) - 1;

/// A typed value bound to its field identity.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicitly absent: serializes to nothing and is always default.
    NotPresent { field: FieldRef },
    U8 { field: FieldRef, value: u8 },
    U16 { field: FieldRef, value: u16 },
    U32 { field: FieldRef, value: u32 },
    U64 { field: FieldRef, value: u64 },
    Hash128 { field: FieldRef, value: Hash128 },
    Hash160 { field: FieldRef, value: Hash160 },
    Hash256 { field: FieldRef, value: Hash256 },
    Blob { field: FieldRef, value: Vec<u8> },
    Account { field: FieldRef, value: AccountId },
    Amount { field: FieldRef, value: Amount },
    Vector256 { field: FieldRef, value: Vec<Hash256> },
    PathSet { field: FieldRef, value: PathSet },
}

impl Value {
    /// The wire discriminant of this variant.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::NotPresent { .. } => TypeId::NotPresent,
            Value::U8 { .. } => TypeId::U8,
            Value::U16 { .. } => TypeId::U16,
            Value::U32 { .. } => TypeId::U32,
            Value::U64 { .. } => TypeId::U64,
            Value::Hash128 { .. } => TypeId::Hash128,
            Value::Hash160 { .. } => TypeId::Hash160,
            Value::Hash256 { .. } => TypeId::Hash256,
            Value::Blob { .. } => TypeId::Blob,
            Value::Account { .. } => TypeId::Account,
            Value::Amount { .. } => TypeId::Amount,
            Value::Vector256 { .. } => TypeId::Vector256,
            Value::PathSet { .. } => TypeId::PathSet,
        }
    }

    /// The field identity this value is bound to.
    pub fn field(&self) -> FieldRef {
        match self {
            Value::NotPresent { field }
            | Value::U8 { field, .. }
            | Value::U16 { field, .. }
            | Value::U32 { field, .. }
            | Value::U64 { field, .. }
            | Value::Hash128 { field, .. }
            | Value::Hash160 { field, .. }
            | Value::Hash256 { field, .. }
            | Value::Blob { field, .. }
            | Value::Account { field, .. }
            | Value::Amount { field, .. }
            | Value::Vector256 { field, .. }
            | Value::PathSet { field, .. } => field,
        }
    }

    /// Rebind the value to another field identity.
    pub fn set_field(&mut self, new_field: FieldRef) {
        match self {
            Value::NotPresent { field }
            | Value::U8 { field, .. }
            | Value::U16 { field, .. }
            | Value::U32 { field, .. }
            | Value::U64 { field, .. }
            | Value::Hash128 { field, .. }
            | Value::Hash160 { field, .. }
            | Value::Hash256 { field, .. }
            | Value::Blob { field, .. }
            | Value::Account { field, .. }
            | Value::Amount { field, .. }
            | Value::Vector256 { field, .. }
            | Value::PathSet { field, .. } => *field = new_field,
        }
    }

    /// Append this field's wire tag.
    pub fn add_field_id(&self, s: &mut Serializer) -> CodecResult<()> {
        let field = self.field();
        s.add_field_id(field.type_id.into(), field.field_value)
    }

    /// Append the payload (no tag).
    pub fn serialize(&self, s: &mut Serializer) -> CodecResult<()> {
        match self {
            Value::NotPresent { .. } => Ok(()),
            Value::U8 { value, .. } => {
                s.add8(*value);
                Ok(())
            }
            Value::U16 { value, .. } => {
                s.add16(*value);
                Ok(())
            }
            Value::U32 { value, .. } => {
                s.add32(*value);
                Ok(())
            }
            Value::U64 { value, .. } => {
                s.add64(*value);
                Ok(())
            }
            Value::Hash128 { value, .. } => {
                s.add128(*value);
                Ok(())
            }
            Value::Hash160 { value, .. } => {
                s.add160(*value);
                Ok(())
            }
            Value::Hash256 { value, .. } => {
                s.add256(*value);
                Ok(())
            }
            Value::Blob { value, .. } => s.add_vl(value),
            Value::Account { value, .. } => s.add_vl(value.as_slice()),
            Value::Amount { value, .. } => add_amount(s, value),
            Value::Vector256 { value, .. } => {
                let mut bytes = Vec::with_capacity(value.len() * Hash256::WIDTH);
                for hash in value {
                    bytes.extend_from_slice(hash.as_slice());
                }
                s.add_vl(&bytes)
            }
            Value::PathSet { value, .. } => add_path_set(s, value),
        }
    }

    /// Read a payload of the field's type and bind it to the field.
    pub fn deserialize(it: &mut SerializerIterator<'_>, field: FieldRef) -> CodecResult<Value> {
        let value = match field.type_id {
            TypeId::NotPresent => Value::NotPresent { field },
            TypeId::U8 => Value::U8 {
                field,
                value: it.read8()?,
            },
            TypeId::U16 => Value::U16 {
                field,
                value: it.read16()?,
            },
            TypeId::U32 => Value::U32 {
                field,
                value: it.read32()?,
            },
            TypeId::U64 => Value::U64 {
                field,
                value: it.read64()?,
            },
            TypeId::Hash128 => Value::Hash128 {
                field,
                value: it.read128()?,
            },
            TypeId::Hash160 => Value::Hash160 {
                field,
                value: it.read160()?,
            },
            TypeId::Hash256 => Value::Hash256 {
                field,
                value: it.read256()?,
            },
            TypeId::Blob => Value::Blob {
                field,
                value: it.read_vl()?,
            },
            TypeId::Account => {
                let raw = it.read_vl()?;
                let bytes: [u8; 20] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| CodecError::MalformedAccount { len: raw.len() })?;
                Value::Account {
                    field,
                    value: AccountId::from_bytes(bytes),
                }
            }
            TypeId::Amount => Value::Amount {
                field,
                value: read_amount(it)?,
            },
            TypeId::Vector256 => {
                let raw = it.read_vl()?;
                if raw.len() % Hash256::WIDTH != 0 {
                    return Err(CodecError::MalformedVector { len: raw.len() });
                }
                let value = raw
                    .chunks_exact(Hash256::WIDTH)
                    .map(|chunk| Hash256::from_bytes(chunk.try_into().unwrap()))
                    .collect();
                Value::Vector256 { field, value }
            }
            TypeId::PathSet => Value::PathSet {
                field,
                value: read_path_set(it)?,
            },
        };
        Ok(value)
    }

    /// Read a field tag, resolve it in the registry, and deserialize the
    /// payload that follows.
    pub fn read(it: &mut SerializerIterator<'_>) -> CodecResult<Value> {
        let (type_id, field_value) = it.read_field_id()?;
        let field = field::lookup(type_id, field_value).ok_or(CodecError::UnknownField {
            type_id,
            field_value,
        })?;
        Value::deserialize(it, field)
    }

    /// Whether the object layer may omit this value as absent.
    pub fn is_default(&self) -> bool {
        match self {
            Value::NotPresent { .. } => true,
            Value::U8 { value, .. } => *value == 0,
            Value::U16 { value, .. } => *value == 0,
            Value::U32 { value, .. } => *value == 0,
            Value::U64 { value, .. } => *value == 0,
            Value::Hash128 { value, .. } => value.is_zero(),
            Value::Hash160 { value, .. } => value.is_zero(),
            Value::Hash256 { value, .. } => value.is_zero(),
            Value::Blob { value, .. } => value.is_empty(),
            Value::Account { value, .. } => value.is_zero(),
            Value::Amount { value, .. } => {
                value.is_zero() && value.currency().is_zero() && value.issuer().is_zero()
            }
            Value::Vector256 { value, .. } => value.is_empty(),
            Value::PathSet { value, .. } => value.is_empty(),
        }
    }

    /// Same variant, same payload under the variant's own equality. Field
    /// identities do not participate.
    pub fn equivalent(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::NotPresent { .. }, Value::NotPresent { .. }) => true,
            (Value::U8 { value: a, .. }, Value::U8 { value: b, .. }) => a == b,
            (Value::U16 { value: a, .. }, Value::U16 { value: b, .. }) => a == b,
            (Value::U32 { value: a, .. }, Value::U32 { value: b, .. }) => a == b,
            (Value::U64 { value: a, .. }, Value::U64 { value: b, .. }) => a == b,
            (Value::Hash128 { value: a, .. }, Value::Hash128 { value: b, .. }) => a == b,
            (Value::Hash160 { value: a, .. }, Value::Hash160 { value: b, .. }) => a == b,
            (Value::Hash256 { value: a, .. }, Value::Hash256 { value: b, .. }) => a == b,
            (Value::Blob { value: a, .. }, Value::Blob { value: b, .. }) => a == b,
            (Value::Account { value: a, .. }, Value::Account { value: b, .. }) => a == b,
            (Value::Amount { value: a, .. }, Value::Amount { value: b, .. }) => a == b,
            (Value::Vector256 { value: a, .. }, Value::Vector256 { value: b, .. }) => a == b,
            (Value::PathSet { value: a, .. }, Value::PathSet { value: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Just the value, rendered as text.
    pub fn text(&self) -> String {
        match self {
            Value::NotPresent { .. } => String::new(),
            Value::U8 { value, .. } => value.to_string(),
            Value::U16 { value, .. } => value.to_string(),
            Value::U32 { value, .. } => value.to_string(),
            Value::U64 { value, .. } => value.to_string(),
            Value::Hash128 { value, .. } => value.to_string(),
            Value::Hash160 { value, .. } => value.to_string(),
            Value::Hash256 { value, .. } => value.to_string(),
            Value::Blob { value, .. } => hex::encode(value),
            Value::Account { value, .. } => value.to_string(),
            Value::Amount { value, .. } => value.text(),
            Value::Vector256 { value, .. } => value
                .iter()
                .map(Hash256::to_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::PathSet { .. } => self.json().to_string(),
        }
    }

    /// `Name = value` when the field has a name, bare value otherwise.
    pub fn full_text(&self) -> String {
        if matches!(self, Value::NotPresent { .. }) {
            return String::new();
        }
        let field = self.field();
        if field.has_name() {
            format!("{} = {}", field.name, self.text())
        } else {
            self.text()
        }
    }

    /// Structured rendering. Integer fields wider than 32 bits become
    /// decimal strings; hashes, blobs and accounts are hex strings.
    pub fn json(&self) -> serde_json::Value {
        match self {
            Value::NotPresent { .. } => serde_json::Value::Null,
            Value::U8 { value, .. } => json!(value),
            Value::U16 { value, .. } => json!(value),
            Value::U32 { value, .. } => json!(value),
            Value::U64 { value, .. } => json!(value.to_string()),
            Value::Hash128 { value, .. } => json!(value.to_string()),
            Value::Hash160 { value, .. } => json!(value.to_string()),
            Value::Hash256 { value, .. } => json!(value.to_string()),
            Value::Blob { value, .. } => json!(hex::encode_upper(value)),
            Value::Account { value, .. } => json!(value.to_string()),
            Value::Amount { value, .. } => value.json(),
            Value::Vector256 { value, .. } => {
                json!(value.iter().map(Hash256::to_string).collect::<Vec<_>>())
            }
            Value::PathSet { value, .. } => path_set_json(value),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other)
    }
}

fn add_amount(s: &mut Serializer, amount: &Amount) -> CodecResult<()> {
    if amount.is_native() {
        let word = if amount.is_negative() {
            amount.mantissa()
        } else {
            amount.mantissa() | AMOUNT_POSITIVE
        };
        s.add64(word);
        return Ok(());
    }
    if amount.currency().is_bad() {
        return Err(CodecError::MalformedAmount {
            reason: "reserved currency id on an issued amount".to_string(),
        });
    }
    let word = if amount.is_zero() {
        AMOUNT_NOT_NATIVE
    } else {
        let biased = (amount.exponent() + 97) as u64;
        let mut word = AMOUNT_NOT_NATIVE | (biased << 54) | amount.mantissa();
        if !amount.is_negative() {
            word |= AMOUNT_POSITIVE;
        }
        word
    };
    s.add64(word);
    s.add160(amount.currency());
    s.add160(amount.issuer());
    Ok(())
}

fn read_amount(it: &mut SerializerIterator<'_>) -> CodecResult<Amount> {
    let word = it.read64()?;
    if word & AMOUNT_NOT_NATIVE == 0 {
        let negative = word & AMOUNT_POSITIVE == 0;
        let mantissa = word & !AMOUNT_POSITIVE;
        if mantissa > MAX_NATIVE {
            return Err(CodecError::MalformedAmount {
                reason: format!("native mantissa {mantissa} above cap"),
            });
        }
        if negative && mantissa == 0 {
            return Err(CodecError::MalformedAmount {
                reason: "negative native zero is not canonical".to_string(),
            });
        }
        let mut amount = Amount::native(mantissa)?;
        if negative {
            amount.negate();
        }
        return Ok(amount);
    }

    let currency: Currency = it.read160()?.into();
    let issuer: AccountId = it.read160()?.into();
    if currency.is_native() {
        return Err(CodecError::MalformedAmount {
            reason: "issued amount with the native currency id".to_string(),
        });
    }
    if currency.is_bad() {
        return Err(CodecError::MalformedAmount {
            reason: "reserved currency id on an issued amount".to_string(),
        });
    }

    let mantissa = word & AMOUNT_MANTISSA_MASK;
    let header = word >> 54;
    if mantissa == 0 {
        // A canonical issued zero is bit 63 alone.
        if header != 0x200 {
            return Err(CodecError::MalformedAmount {
                reason: "non-canonical issued zero".to_string(),
            });
        }
        return Ok(Amount::zero(currency, issuer));
    }
    let negative = header & 0x100 == 0;
    let exponent = (header & 0xFF) as i32 - 97;
    if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
        || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent)
    {
        return Err(CodecError::MalformedAmount {
            reason: format!("mantissa {mantissa} at exponent {exponent} out of band"),
        });
    }
    Ok(Amount::new(currency, issuer, mantissa, exponent, negative)?)
}

fn add_path_set(s: &mut Serializer, set: &PathSet) -> CodecResult<()> {
    if set.len() > MAX_PATHS {
        return Err(CodecError::MalformedPath {
            reason: format!("{} paths exceed the limit of {MAX_PATHS}", set.len()),
        });
    }
    let mut first = true;
    for path in set {
        if path.is_empty() {
            return Err(CodecError::MalformedPath {
                reason: "empty path in a non-empty set".to_string(),
            });
        }
        if path.len() > MAX_PATH_ELEMENTS {
            return Err(CodecError::MalformedPath {
                reason: format!("{} hops exceed the limit of {MAX_PATH_ELEMENTS}", path.len()),
            });
        }
        if !first {
            s.add8(PATH_BOUNDARY);
        }
        for hop in path {
            let mask = hop.mask();
            if mask == 0 || mask & !HOP_VALID_BITS != 0 {
                return Err(CodecError::MalformedPath {
                    reason: format!("hop mask {mask:#04x} is not encodable"),
                });
            }
            s.add8(mask);
            if hop.has_account() {
                s.add160(hop.account());
            }
            if hop.has_currency() {
                s.add160(hop.currency());
            }
            if hop.has_issuer() {
                s.add160(hop.issuer());
            }
        }
        first = false;
    }
    s.add8(PATH_END);
    Ok(())
}

/// Hop-stream parser: a small state machine over the sentinel bytes. `END`
/// closes the set, `BOUNDARY` closes the current path, any other byte is a
/// hop mask naming which 20-byte fields follow.
fn read_path_set(it: &mut SerializerIterator<'_>) -> CodecResult<PathSet> {
    let mut paths: Vec<Path> = Vec::new();
    let mut current = Path::new();
    loop {
        let marker = it.read8()?;
        match marker {
            PATH_END => {
                if !current.is_empty() {
                    paths.push(current);
                } else if !paths.is_empty() {
                    warn!("path set ends with an empty path");
                    return Err(CodecError::MalformedPath {
                        reason: "empty path before end of set".to_string(),
                    });
                }
                // A bare END with nothing before it is the empty set.
                break;
            }
            PATH_BOUNDARY => {
                if current.is_empty() {
                    warn!("empty path at boundary");
                    return Err(CodecError::MalformedPath {
                        reason: "empty path at boundary".to_string(),
                    });
                }
                paths.push(std::mem::take(&mut current));
                if paths.len() >= MAX_PATHS {
                    return Err(CodecError::MalformedPath {
                        reason: format!("more than {MAX_PATHS} paths"),
                    });
                }
            }
            mask => {
                if mask & !HOP_VALID_BITS != 0 {
                    warn!(mask, "invalid bits in hop mask");
                    return Err(CodecError::MalformedPath {
                        reason: format!("hop mask {mask:#04x} has invalid bits"),
                    });
                }
                let account: AccountId = if mask & HOP_ACCOUNT != 0 {
                    it.read160()?.into()
                } else {
                    AccountId::ZERO
                };
                let currency: Currency = if mask & HOP_CURRENCY != 0 {
                    it.read160()?.into()
                } else {
                    Currency::XRP
                };
                let issuer: AccountId = if mask & HOP_ISSUER != 0 {
                    it.read160()?.into()
                } else {
                    AccountId::ZERO
                };
                if current.len() >= MAX_PATH_ELEMENTS {
                    return Err(CodecError::MalformedPath {
                        reason: format!("more than {MAX_PATH_ELEMENTS} hops in a path"),
                    });
                }
                current.push(PathElement::with_mask(mask, account, currency, issuer));
            }
        }
    }
    Ok(PathSet::from_paths(paths))
}

fn path_set_json(set: &PathSet) -> serde_json::Value {
    let paths: Vec<serde_json::Value> = set
        .iter()
        .map(|path| {
            let hops: Vec<serde_json::Value> = path
                .iter()
                .map(|hop| {
                    let mut obj = serde_json::Map::new();
                    obj.insert("type".to_string(), json!(hop.mask()));
                    if hop.has_account() {
                        obj.insert("account".to_string(), json!(hop.account().to_string()));
                    }
                    if hop.has_currency() {
                        obj.insert("currency".to_string(), json!(hop.currency().code()));
                    }
                    if hop.has_issuer() {
                        obj.insert("issuer".to_string(), json!(hop.issuer().to_string()));
                    }
                    serde_json::Value::Object(obj)
                })
                .collect();
            json!(hops)
        })
        .collect();
    json!(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fields;

    fn usd() -> Currency {
        Currency::from_code("USD").unwrap()
    }

    fn gateway() -> AccountId {
        AccountId::from_hex("0102030405060708090A0B0C0D0E0F1011121314").unwrap()
    }

    fn roundtrip(value: &Value) -> Value {
        let mut s = Serializer::new();
        value.add_field_id(&mut s).unwrap();
        value.serialize(&mut s).unwrap();
        let mut it = SerializerIterator::new(s.raw());
        let back = Value::read(&mut it).unwrap();
        assert!(it.is_done(), "trailing bytes after {:?}", value.type_id());
        back
    }

    #[test]
    fn test_integer_roundtrips() {
        let values = [
            Value::U8 {
                field: &fields::CLOSE_RESOLUTION,
                value: 0x7F,
            },
            Value::U16 {
                field: &fields::TRANSACTION_TYPE,
                value: 0xBEEF,
            },
            Value::U32 {
                field: &fields::SEQUENCE,
                value: 0xDEAD_BEEF,
            },
            Value::U64 {
                field: &fields::EXCHANGE_RATE,
                value: 0x0123_4567_89AB_CDEF,
            },
        ];
        for v in &values {
            let back = roundtrip(v);
            assert_eq!(&back, v);
            assert!(std::ptr::eq(back.field(), v.field()));
        }
    }

    #[test]
    fn test_hash_and_blob_roundtrips() {
        let values = [
            Value::Hash128 {
                field: &fields::EMAIL_HASH,
                value: Hash128::from_bytes([0x11; 16]),
            },
            Value::Hash160 {
                field: &fields::TAKER_PAYS_CURRENCY,
                value: Hash160::from_bytes([0x22; 20]),
            },
            Value::Hash256 {
                field: &fields::INVOICE_ID,
                value: Hash256::from_bytes([0x33; 32]),
            },
            Value::Blob {
                field: &fields::SIGNING_PUB_KEY,
                value: vec![0xAA; 33],
            },
            Value::Account {
                field: &fields::DESTINATION,
                value: gateway(),
            },
        ];
        for v in &values {
            assert_eq!(&roundtrip(v), v);
        }
    }

    #[test]
    fn test_amount_roundtrips() {
        let amounts = [
            Amount::native(10_000_000).unwrap(),
            Amount::native_signed(-5).unwrap(),
            Amount::default(),
            Amount::new(usd(), gateway(), 1, 0, false).unwrap(),
            Amount::new(usd(), gateway(), 123_456, -8, true).unwrap(),
            Amount::zero(usd(), gateway()),
        ];
        for a in &amounts {
            let v = Value::Amount {
                field: &fields::AMOUNT,
                value: *a,
            };
            let back = roundtrip(&v);
            assert_eq!(&back, &v);
            if let Value::Amount { value, .. } = back {
                assert_eq!(value.issuer(), a.issuer());
                assert_eq!(value.exponent(), a.exponent());
            } else {
                panic!("wrong variant");
            }
        }
    }

    #[test]
    fn test_vector256_roundtrip() {
        let v = Value::Vector256 {
            field: &fields::HASHES,
            value: vec![Hash256::ONE, Hash256::from_bytes([0x44; 32])],
        };
        assert_eq!(roundtrip(&v), v);

        let empty = Value::Vector256 {
            field: &fields::INDEXES,
            value: vec![],
        };
        assert_eq!(roundtrip(&empty), empty);
        assert!(empty.is_default());
    }

    #[test]
    fn test_vector256_rejects_ragged_payload() {
        let mut s = Serializer::new();
        s.add_vl(&[0u8; 33]).unwrap();
        let mut it = SerializerIterator::new(s.raw());
        assert!(matches!(
            Value::deserialize(&mut it, &fields::HASHES),
            Err(CodecError::MalformedVector { len: 33 })
        ));
    }

    #[test]
    fn test_account_rejects_wrong_width() {
        let mut s = Serializer::new();
        s.add_vl(&[0u8; 21]).unwrap();
        let mut it = SerializerIterator::new(s.raw());
        assert!(matches!(
            Value::deserialize(&mut it, &fields::ACCOUNT),
            Err(CodecError::MalformedAccount { len: 21 })
        ));
    }

    #[test]
    fn test_path_set_roundtrip() {
        let mut path_a = Path::new();
        path_a.push(PathElement::new(gateway(), usd(), AccountId::ONE, false));
        path_a.push(PathElement::new(AccountId::ZERO, usd(), AccountId::ZERO, false));
        let mut path_b = Path::new();
        path_b.push(PathElement::new(AccountId::ONE, Currency::XRP, AccountId::ZERO, false));

        let v = Value::PathSet {
            field: &fields::PATHS,
            value: PathSet::from_paths(vec![path_a, path_b]),
        };
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn test_empty_path_set_roundtrip() {
        let v = Value::PathSet {
            field: &fields::PATHS,
            value: PathSet::new(),
        };
        let back = roundtrip(&v);
        assert_eq!(back, v);
        assert!(back.is_default());
    }

    #[test]
    fn test_path_set_rejects_invalid_mask() {
        // 0x02 is not a valid hop mask bit.
        let mut it = SerializerIterator::new(&[0x02, 0x00]);
        assert!(matches!(
            read_path_set(&mut it),
            Err(CodecError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_path_set_rejects_empty_path() {
        // BOUNDARY immediately after BOUNDARY.
        let hop = [0x01u8];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&hop);
        bytes.extend_from_slice(&[0u8; 20]);
        bytes.push(PATH_BOUNDARY);
        bytes.push(PATH_BOUNDARY);
        let mut it = SerializerIterator::new(&bytes);
        assert!(matches!(
            read_path_set(&mut it),
            Err(CodecError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_not_present() {
        let v = Value::NotPresent {
            field: field::generic(),
        };
        let mut s = Serializer::new();
        v.serialize(&mut s).unwrap();
        assert!(s.is_empty());
        assert!(v.is_default());
        assert_eq!(v.text(), "");
    }

    #[test]
    fn test_equivalence_ignores_field() {
        let a = Value::U32 {
            field: &fields::SEQUENCE,
            value: 7,
        };
        let b = Value::U32 {
            field: &fields::FLAGS,
            value: 7,
        };
        assert!(a.equivalent(&b));
        assert_eq!(a, b);
        let c = Value::U32 {
            field: &fields::SEQUENCE,
            value: 8,
        };
        assert_ne!(a, c);
        // Different variants are never equivalent.
        let d = Value::U16 {
            field: &fields::TRANSACTION_TYPE,
            value: 7,
        };
        assert!(!a.equivalent(&d));
    }

    #[test]
    fn test_unknown_field_tag() {
        let mut s = Serializer::new();
        s.add_field_id(2, 250).unwrap();
        s.add32(1);
        let mut it = SerializerIterator::new(s.raw());
        assert!(matches!(
            Value::read(&mut it),
            Err(CodecError::UnknownField {
                type_id: 2,
                field_value: 250
            })
        ));
    }

    #[test]
    fn test_full_text_and_json() {
        let v = Value::U64 {
            field: &fields::INDEX_NEXT,
            value: u64::MAX,
        };
        assert_eq!(v.full_text(), format!("IndexNext = {}", u64::MAX));
        // 64-bit integers render as strings.
        assert_eq!(v.json(), json!(u64::MAX.to_string()));

        let small = Value::U32 {
            field: &fields::SEQUENCE,
            value: 9,
        };
        assert_eq!(small.json(), json!(9));
    }
}
