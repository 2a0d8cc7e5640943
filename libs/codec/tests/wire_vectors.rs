//! Known-answer tests for the canonical wire form
//!
//! These vectors pin the byte-exact encoding: field tags, amount headers,
//! length prefixes, and path framing. A change that shifts any of these
//! bytes breaks cross-implementation hashing.

use payline_codec::{fields, Serializer, SerializerIterator, Value};
use payline_types::{AccountId, Amount, Currency, Path, PathElement, PathSet};

fn usd() -> Currency {
    Currency::from_code("USD").unwrap()
}

fn gateway() -> AccountId {
    AccountId::from_hex("0102030405060708090A0B0C0D0E0F1011121314").unwrap()
}

fn encode(value: &Value) -> Vec<u8> {
    let mut s = Serializer::new();
    value.add_field_id(&mut s).unwrap();
    value.serialize(&mut s).unwrap();
    s.into_bytes()
}

#[test]
fn u32_field_tag_and_payload() {
    let v = Value::U32 {
        field: &fields::FLAGS,
        value: 0x1234_5678,
    };
    // Flags is (type 2, field 2): one tag byte 0x22.
    assert_eq!(encode(&v), vec![0x22, 0x12, 0x34, 0x56, 0x78]);
}

#[test]
fn native_amount_header() {
    let v = Value::Amount {
        field: &fields::AMOUNT,
        value: Amount::native(10_000_000).unwrap(),
    };
    // Positive native: bit 62 over the mantissa.
    assert_eq!(
        encode(&v),
        vec![0x61, 0x40, 0x00, 0x00, 0x00, 0x00, 0x98, 0x96, 0x80]
    );
}

#[test]
fn native_zero_header() {
    let v = Value::Amount {
        field: &fields::AMOUNT,
        value: Amount::default(),
    };
    assert_eq!(
        encode(&v),
        vec![0x61, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn negative_native_amount_header() {
    let v = Value::Amount {
        field: &fields::AMOUNT,
        value: Amount::native_signed(-1).unwrap(),
    };
    // Negative native: bare mantissa, bit 62 clear.
    assert_eq!(
        encode(&v),
        vec![0x61, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]
    );
}

#[test]
fn issued_amount_wire_form() {
    // One USD: mantissa 10^15, exponent -15, positive.
    // Header: notNative | positive | (exponent+97 = 82) << 54 | mantissa.
    let amount = Amount::new(usd(), gateway(), 1_000_000_000_000_000, -15, false).unwrap();
    let v = Value::Amount {
        field: &fields::AMOUNT,
        value: amount,
    };
    let mut expected = vec![0x61, 0xD4, 0x83, 0x8D, 0x7E, 0xA4, 0xC6, 0x80, 0x00];
    // 20 bytes of currency: "USD" at offsets 12..15.
    let mut currency = [0u8; 20];
    currency[12..15].copy_from_slice(b"USD");
    expected.extend_from_slice(&currency);
    expected.extend_from_slice(gateway().as_slice());
    assert_eq!(encode(&v), expected);
}

#[test]
fn issued_zero_wire_form() {
    let v = Value::Amount {
        field: &fields::AMOUNT,
        value: Amount::zero(usd(), gateway()),
    };
    let bytes = encode(&v);
    assert_eq!(bytes.len(), 1 + 8 + 20 + 20);
    // Issued zero: bit 63 alone.
    assert_eq!(&bytes[1..9], &[0x80, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn vl_two_byte_prefix() {
    let v = Value::Blob {
        field: &fields::SIGNING_PUB_KEY,
        value: vec![0x5A; 200],
    };
    let bytes = encode(&v);
    // Tag 0x73 (type 7, field 3), then prefix (200-193)>>8 + 193 = 0xC1, 0x07.
    assert_eq!(&bytes[..3], &[0x73, 0xC1, 0x07]);
    assert_eq!(bytes.len(), 3 + 200);
}

#[test]
fn path_set_framing() {
    let a = AccountId::from_bytes([0xAA; 20]);
    let issuer = AccountId::from_bytes([0x11; 20]);
    let b = AccountId::from_bytes([0xBB; 20]);

    let mut first = Path::new();
    first.push(PathElement::new(a, usd(), issuer, false));
    let mut second = Path::new();
    second.push(PathElement::new(b, Currency::XRP, AccountId::ZERO, false));

    let v = Value::PathSet {
        field: &fields::PATHS,
        value: PathSet::from_paths(vec![first, second]),
    };

    let mut expected = Vec::new();
    // Tag: PathSet is (type 18, field 1); a big type with a small field
    // encodes as the field nibble then the type byte.
    expected.push(0x01);
    expected.push(18);
    expected.push(0x31); // account | currency | issuer
    expected.extend_from_slice(&[0xAA; 20]);
    let mut currency = [0u8; 20];
    currency[12..15].copy_from_slice(b"USD");
    expected.extend_from_slice(&currency);
    expected.extend_from_slice(&[0x11; 20]);
    expected.push(0xFF); // boundary: another path follows
    expected.push(0x01); // account only
    expected.extend_from_slice(&[0xBB; 20]);
    expected.push(0x00); // end of set

    assert_eq!(encode(&v), expected);
}

#[test]
fn divide_vector() {
    let ten = Amount::new(usd(), gateway(), 10, 0, false).unwrap();
    let three = Amount::new(usd(), gateway(), 3, 0, false).unwrap();
    let q = Amount::divide(&ten, &three, usd(), gateway()).unwrap();
    assert_eq!(q.mantissa(), 3_333_333_333_333_333);
    assert_eq!(q.exponent(), -15);
}

#[test]
fn decoder_rejects_reserved_currency() {
    // Hand-craft an issued amount carrying the ASCII-XRP currency id.
    let mut s = Serializer::new();
    s.add64(0xD483_8D7E_A4C6_8000);
    s.add160(Currency::BAD);
    s.add160(gateway());
    let mut it = SerializerIterator::new(s.raw());
    let err = Value::deserialize(&mut it, &fields::AMOUNT).unwrap_err();
    assert!(matches!(
        err,
        payline_codec::CodecError::MalformedAmount { .. }
    ));
}

#[test]
fn decoder_rejects_out_of_band_mantissa() {
    // Mantissa below 10^15 with a nonzero value is not canonical.
    let mantissa = 999_999_999_999_999u64;
    let header = 0x8000_0000_0000_0000u64 | 0x4000_0000_0000_0000 | ((82u64) << 54) | mantissa;
    let mut s = Serializer::new();
    s.add64(header);
    s.add160(usd());
    s.add160(gateway());
    let mut it = SerializerIterator::new(s.raw());
    assert!(Value::deserialize(&mut it, &fields::AMOUNT).is_err());
}

#[test]
fn decoder_rejects_truncated_amount() {
    let mut s = Serializer::new();
    s.add64(0x8000_0000_0000_0000);
    s.add160(usd());
    // Issuer missing.
    let mut it = SerializerIterator::new(s.raw());
    assert!(matches!(
        Value::deserialize(&mut it, &fields::AMOUNT),
        Err(payline_codec::CodecError::TruncatedInput { .. })
    ));
}
