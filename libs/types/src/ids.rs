//! Fixed-width identifiers used throughout the wire protocol
//!
//! Every entity the protocol talks about — accounts, currencies, ledger and
//! transaction hashes — is a fixed-width big-endian byte string. This module
//! provides distinct wrapper types so a currency id cannot be handed to an
//! API expecting an account id, plus the compile-time zero/one constants the
//! arithmetic layer uses as placeholders (there are no process-wide mutable
//! sentinels anywhere in this crate).
//!
//! All wrappers are `repr(transparent)` over their byte arrays and derive the
//! zerocopy traits, so a slice of them can be viewed as raw wire bytes
//! without copying.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Failures turning human-readable text into an identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdParseError {
    /// Hex string does not decode to the exact width of the target type.
    #[error("expected {expected} hex bytes, got {got}")]
    BadHexLength { expected: usize, got: usize },

    /// Input contains non-hexadecimal characters.
    #[error("invalid hex string: {0}")]
    BadHex(String),

    /// Currency code is not empty, three printable ASCII characters, or forty hex digits.
    #[error("invalid currency code: {0:?}")]
    BadCurrencyCode(String),
}

macro_rules! fixed_hash {
    ($(#[$doc:meta])* $name:ident, $bytes:expr) => {
        $(#[$doc])*
        #[repr(transparent)]
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
            AsBytes, FromBytes, FromZeroes, Serialize, Deserialize,
        )]
        pub struct $name(pub [u8; $bytes]);

        impl $name {
            /// Width of the identifier in bytes.
            pub const WIDTH: usize = $bytes;

            /// The all-zero identifier.
            pub const ZERO: Self = Self([0u8; $bytes]);

            /// The big-endian value one, used as a placeholder identity.
            pub const ONE: Self = {
                let mut b = [0u8; $bytes];
                b[$bytes - 1] = 1;
                Self(b)
            };

            pub const fn from_bytes(bytes: [u8; $bytes]) -> Self {
                Self(bytes)
            }

            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|&b| b == 0)
            }

            /// Parse from a hex string of exactly the right width.
            pub fn from_hex(s: &str) -> Result<Self, IdParseError> {
                let raw = hex::decode(s).map_err(|_| IdParseError::BadHex(s.to_string()))?;
                let arr: [u8; $bytes] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| IdParseError::BadHexLength {
                        expected: $bytes,
                        got: raw.len(),
                    })?;
                Ok(Self(arr))
            }
        }

        impl From<[u8; $bytes]> for $name {
            fn from(bytes: [u8; $bytes]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

fixed_hash!(
    /// 128-bit opaque hash (e.g. email hashes).
    Hash128,
    16
);

fixed_hash!(
    /// 160-bit opaque hash. Also the raw form of [`AccountId`] and [`Currency`].
    Hash160,
    20
);

fixed_hash!(
    /// 256-bit opaque hash (ledger hashes, transaction ids, index keys).
    Hash256,
    32
);

fixed_hash!(
    /// A 20-byte account identifier.
    ///
    /// `AccountId::ZERO` is the native-token pseudo-account; `AccountId::ONE`
    /// is the placeholder identity used by dimensionless rate amounts.
    AccountId,
    20
);

fixed_hash!(
    /// A 20-byte currency identifier.
    ///
    /// The all-zero id is the native token. Three-letter codes occupy bytes
    /// 12..15 of the id with every other byte zero; anything else is treated
    /// as an opaque 160-bit currency.
    Currency,
    20
);

impl From<AccountId> for Hash160 {
    fn from(v: AccountId) -> Self {
        Self(v.0)
    }
}

impl From<Hash160> for AccountId {
    fn from(v: Hash160) -> Self {
        Self(v.0)
    }
}

impl From<Currency> for Hash160 {
    fn from(v: Currency) -> Self {
        Self(v.0)
    }
}

impl From<Hash160> for Currency {
    fn from(v: Hash160) -> Self {
        Self(v.0)
    }
}

/// Offset of the three-character code inside a 20-byte currency id.
const CODE_OFFSET: usize = 12;

impl Currency {
    /// The native token: the all-zero currency id.
    pub const XRP: Currency = Currency::ZERO;

    /// Reserved pattern: the ASCII letters "XRP" in the code slot. Issued
    /// amounts must never carry this id; the native token is spelled with
    /// the all-zero id instead.
    pub const BAD: Currency = {
        let mut b = [0u8; 20];
        b[CODE_OFFSET] = b'X';
        b[CODE_OFFSET + 1] = b'R';
        b[CODE_OFFSET + 2] = b'P';
        Currency(b)
    };

    /// True for the native (all-zero) currency id.
    pub fn is_native(&self) -> bool {
        self.is_zero()
    }

    /// True for the reserved ASCII-"XRP" pattern.
    pub fn is_bad(&self) -> bool {
        *self == Self::BAD
    }

    /// Decode a human currency code.
    ///
    /// Empty and `"XRP"` give the native id; three printable ASCII
    /// characters land in the code slot; forty hex digits give the full id.
    pub fn from_code(code: &str) -> Result<Currency, IdParseError> {
        if code.is_empty() || code == "XRP" {
            return Ok(Currency::XRP);
        }
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_graphic()) {
            let mut bytes = [0u8; 20];
            bytes[CODE_OFFSET..CODE_OFFSET + 3].copy_from_slice(code.as_bytes());
            return Ok(Currency(bytes));
        }
        if code.len() == 40 {
            return Currency::from_hex(code)
                .map_err(|_| IdParseError::BadCurrencyCode(code.to_string()));
        }
        Err(IdParseError::BadCurrencyCode(code.to_string()))
    }

    /// Render the human code: `"XRP"` for native, `"1"` for the placeholder,
    /// the three ASCII characters when the id has standard layout, uppercase
    /// hex otherwise.
    pub fn code(&self) -> String {
        if self.is_zero() {
            return "XRP".to_string();
        }
        if *self == Currency::ONE {
            return "1".to_string();
        }
        let standard_layout = self
            .0
            .iter()
            .enumerate()
            .all(|(i, &b)| (CODE_OFFSET..CODE_OFFSET + 3).contains(&i) || b == 0);
        let code = &self.0[CODE_OFFSET..CODE_OFFSET + 3];
        if standard_layout && code.iter().all(|b| b.is_ascii_graphic()) {
            // Safe: all three bytes are printable ASCII.
            return String::from_utf8_lossy(code).into_owned();
        }
        hex::encode_upper(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_one_constants() {
        assert!(Hash160::ZERO.is_zero());
        assert!(!Hash160::ONE.is_zero());
        assert_eq!(Hash160::ONE.0[19], 1);
        assert_eq!(&Hash160::ONE.0[..19], &[0u8; 19]);
    }

    #[test]
    fn test_hex_roundtrip() {
        let h = Hash256::from_hex(
            "DEADBEEF00000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            h.to_string(),
            "DEADBEEF00000000000000000000000000000000000000000000000000000001"
        );
        assert!(Hash256::from_hex("DEADBEEF").is_err());
        assert!(Hash128::from_hex("zz000000000000000000000000000000").is_err());
    }

    #[test]
    fn test_currency_code_placement() {
        let usd = Currency::from_code("USD").unwrap();
        assert_eq!(&usd.0[12..15], b"USD");
        assert!(usd.0[..12].iter().all(|&b| b == 0));
        assert!(usd.0[15..].iter().all(|&b| b == 0));
        assert_eq!(usd.code(), "USD");
    }

    #[test]
    fn test_currency_native_and_reserved() {
        assert_eq!(Currency::from_code("").unwrap(), Currency::XRP);
        assert_eq!(Currency::from_code("XRP").unwrap(), Currency::XRP);
        assert!(Currency::XRP.is_native());
        assert_eq!(Currency::XRP.code(), "XRP");

        // The reserved pattern spells XRP in the code slot but is not native.
        assert!(!Currency::BAD.is_native());
        assert!(Currency::BAD.is_bad());
        assert_eq!(&Currency::BAD.0[12..15], b"XRP");
    }

    #[test]
    fn test_currency_hex_form() {
        let hexed = Currency::from_code("0123456789ABCDEF0123456789ABCDEF01234567").unwrap();
        assert_eq!(hexed.code(), "0123456789ABCDEF0123456789ABCDEF01234567");
        assert!(Currency::from_code("US").is_err());
        assert!(Currency::from_code("DOLLARS").is_err());
    }

    #[test]
    fn test_account_hash_interchange() {
        let h = Hash160::from_hex("0102030405060708090A0B0C0D0E0F1011121314").unwrap();
        let a: AccountId = h.into();
        assert_eq!(Hash160::from(a), h);
    }
}
