//! # Field registry
//!
//! Every value on the wire is tagged with a field: a `(type_id, field_value)`
//! pair plus a human name and a default policy. The pair is the wire
//! identity; `type_id` selects the concrete value variant and `field_value`
//! disambiguates fields of the same type.
//!
//! The catalog is closed and built at compile time — fields are `static`
//! items referenced everywhere by `&'static Field`, so identity comparison
//! and cross-thread sharing are free. The canonical total order over fields
//! (the order record serialization uses) is lexicographic on
//! `(type_id, field_value)`, exposed through [`Field::code`] and `Ord`.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Wire discriminant of each concrete value variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive,
    Serialize,
)]
#[repr(u16)]
pub enum TypeId {
    /// Sentinel for explicitly absent values; never appears on the wire.
    NotPresent = 0,
    U16 = 1,
    U32 = 2,
    U64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    Account = 8,
    U8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

/// How the object layer treats a field whose value is the variant default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldPolicy {
    /// Always present, always serialized.
    Required,
    /// May be absent; serialized whenever present.
    Optional,
    /// Omitted from serialization while holding the default value.
    Default,
}

/// One entry of the field catalog. Construction happens only in this
/// module; everything else holds `&'static Field` references.
#[derive(Debug)]
pub struct Field {
    pub type_id: TypeId,
    pub field_value: u16,
    pub name: &'static str,
    pub policy: FieldPolicy,
}

/// Shared reference to a registered field. Field identities outlive every
/// value and compare in O(1).
pub type FieldRef = &'static Field;

impl Field {
    const fn new(type_id: TypeId, field_value: u16, name: &'static str, policy: FieldPolicy) -> Self {
        Field {
            type_id,
            field_value,
            name,
            policy,
        }
    }

    /// The canonical sort key: `type_id` in the high half, `field_value` in
    /// the low half.
    pub fn code(&self) -> u32 {
        ((self.type_id as u32) << 16) | self.field_value as u32
    }

    /// Whether this field carries a usable name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// The sentinel identity of values built without a field.
    pub fn is_generic(&self) -> bool {
        std::ptr::eq(self, generic())
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Field {}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl std::hash::Hash for Field {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

static GENERIC: Field = Field::new(TypeId::NotPresent, 0, "", FieldPolicy::Optional);

/// The sentinel field used as the default identity.
pub fn generic() -> FieldRef {
    &GENERIC
}

macro_rules! field_catalog {
    ($( $konst:ident = ($ty:ident, $fv:expr, $name:literal, $policy:ident); )*) => {
        /// The closed catalog of known protocol fields.
        pub mod fields {
            use super::{Field, FieldPolicy, TypeId};

            $( pub static $konst: Field =
                Field::new(TypeId::$ty, $fv, $name, FieldPolicy::$policy); )*

            /// Every catalog entry in declaration order.
            pub static CATALOG: &[&Field] = &[ $( &$konst, )* ];
        }
    };
}

field_catalog! {
    // 8-bit integers
    CLOSE_RESOLUTION = (U8, 1, "CloseResolution", Optional);
    TRANSACTION_RESULT = (U8, 3, "TransactionResult", Optional);

    // 16-bit integers
    LEDGER_ENTRY_TYPE = (U16, 1, "LedgerEntryType", Required);
    TRANSACTION_TYPE = (U16, 2, "TransactionType", Required);

    // 32-bit integers
    FLAGS = (U32, 2, "Flags", Default);
    SOURCE_TAG = (U32, 3, "SourceTag", Optional);
    SEQUENCE = (U32, 4, "Sequence", Required);
    EXPIRATION = (U32, 10, "Expiration", Optional);
    TRANSFER_RATE = (U32, 11, "TransferRate", Optional);
    DESTINATION_TAG = (U32, 14, "DestinationTag", Optional);
    QUALITY_IN = (U32, 20, "QualityIn", Default);
    QUALITY_OUT = (U32, 21, "QualityOut", Default);
    LAST_LEDGER_SEQUENCE = (U32, 27, "LastLedgerSequence", Optional);

    // 64-bit integers
    INDEX_NEXT = (U64, 1, "IndexNext", Optional);
    INDEX_PREVIOUS = (U64, 2, "IndexPrevious", Optional);
    OWNER_NODE = (U64, 4, "OwnerNode", Optional);
    EXCHANGE_RATE = (U64, 6, "ExchangeRate", Optional);

    // 128-bit hashes
    EMAIL_HASH = (Hash128, 1, "EmailHash", Optional);

    // 256-bit hashes
    LEDGER_HASH = (Hash256, 1, "LedgerHash", Optional);
    PARENT_HASH = (Hash256, 2, "ParentHash", Optional);
    TRANSACTION_HASH = (Hash256, 3, "TransactionHash", Optional);
    ACCOUNT_HASH = (Hash256, 4, "AccountHash", Optional);
    PREVIOUS_TXN_ID = (Hash256, 5, "PreviousTxnID", Optional);
    BOOK_DIRECTORY = (Hash256, 16, "BookDirectory", Optional);
    INVOICE_ID = (Hash256, 17, "InvoiceID", Optional);

    // Amounts
    AMOUNT = (Amount, 1, "Amount", Required);
    BALANCE = (Amount, 2, "Balance", Optional);
    LIMIT_AMOUNT = (Amount, 3, "LimitAmount", Optional);
    TAKER_PAYS = (Amount, 4, "TakerPays", Required);
    TAKER_GETS = (Amount, 5, "TakerGets", Required);
    LOW_LIMIT = (Amount, 6, "LowLimit", Optional);
    HIGH_LIMIT = (Amount, 7, "HighLimit", Optional);
    FEE = (Amount, 8, "Fee", Required);
    SEND_MAX = (Amount, 9, "SendMax", Optional);

    // Variable-length blobs
    PUBLIC_KEY = (Blob, 1, "PublicKey", Optional);
    MESSAGE_KEY = (Blob, 2, "MessageKey", Optional);
    SIGNING_PUB_KEY = (Blob, 3, "SigningPubKey", Required);
    TXN_SIGNATURE = (Blob, 4, "TxnSignature", Optional);
    SIGNATURE = (Blob, 6, "Signature", Optional);
    DOMAIN = (Blob, 7, "Domain", Optional);

    // Accounts
    ACCOUNT = (Account, 1, "Account", Required);
    OWNER = (Account, 2, "Owner", Optional);
    DESTINATION = (Account, 3, "Destination", Optional);
    ISSUER = (Account, 4, "Issuer", Optional);
    REGULAR_KEY = (Account, 8, "RegularKey", Optional);

    // 160-bit hashes (order book corners)
    TAKER_PAYS_CURRENCY = (Hash160, 1, "TakerPaysCurrency", Optional);
    TAKER_PAYS_ISSUER = (Hash160, 2, "TakerPaysIssuer", Optional);
    TAKER_GETS_CURRENCY = (Hash160, 3, "TakerGetsCurrency", Optional);
    TAKER_GETS_ISSUER = (Hash160, 4, "TakerGetsIssuer", Optional);

    // Path sets
    PATHS = (PathSet, 1, "Paths", Default);

    // 256-bit hash vectors
    INDEXES = (Vector256, 1, "Indexes", Default);
    HASHES = (Vector256, 2, "Hashes", Optional);
}

static BY_CODE: Lazy<FxHashMap<(u16, u16), FieldRef>> = Lazy::new(|| {
    fields::CATALOG
        .iter()
        .map(|f| ((f.type_id.into(), f.field_value), *f))
        .collect()
});

static BY_NAME: Lazy<FxHashMap<&'static str, FieldRef>> =
    Lazy::new(|| fields::CATALOG.iter().map(|f| (f.name, *f)).collect());

/// Look a field up by its wire identity.
pub fn lookup(type_id: u16, field_value: u16) -> Option<FieldRef> {
    BY_CODE.get(&(type_id, field_value)).copied()
}

/// Look a field up by its human name.
pub fn by_name(name: &str) -> Option<FieldRef> {
    BY_NAME.get(name).copied()
}

/// Every registered field, in declaration order.
pub fn all() -> &'static [FieldRef] {
    fields::CATALOG
}
