//! Payment paths
//!
//! A path is an ordered run of hops between the sender and the receiver;
//! a path set is the ordered alternatives a transaction offers the engine.
//! Each hop names any of an account to route credit through, a currency to
//! switch to, and an issuer — which of the three are present is recorded in
//! the hop's type mask. A hop without an account is an offer-crossing step.
//!
//! This module is the pure data model; the in-band wire framing (the
//! `END`/`BOUNDARY` sentinel bytes) lives in the codec layer.

use crate::ids::{AccountId, Currency};
use serde::{Deserialize, Serialize};

/// Mask bit: the hop carries an account.
pub const HOP_ACCOUNT: u8 = 0x01;
/// Mask bit: the hop carries a currency.
pub const HOP_CURRENCY: u8 = 0x10;
/// Mask bit: the hop carries an issuer.
pub const HOP_ISSUER: u8 = 0x20;
/// All mask bits a hop may legally carry.
pub const HOP_VALID_BITS: u8 = HOP_ACCOUNT | HOP_CURRENCY | HOP_ISSUER;

/// Framing sentinel: end of the current path and of the whole set.
pub const PATH_END: u8 = 0x00;
/// Framing sentinel: end of the current path, another follows.
pub const PATH_BOUNDARY: u8 = 0xFF;

/// Most hops a single path may carry on the wire.
pub const MAX_PATH_ELEMENTS: usize = 100;
/// Most paths a single set may carry on the wire.
pub const MAX_PATHS: usize = 100;

/// One hop of a payment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    mask: u8,
    account: AccountId,
    currency: Currency,
    issuer: AccountId,
}

impl PathElement {
    /// Build a hop, inferring the mask from which fields are nonzero.
    /// `force_currency` keeps the currency bit even for the native (zero)
    /// currency, so a switch back to the native token stays explicit.
    pub fn new(
        account: AccountId,
        currency: Currency,
        issuer: AccountId,
        force_currency: bool,
    ) -> Self {
        let mut mask = 0u8;
        if !account.is_zero() {
            mask |= HOP_ACCOUNT;
        }
        if !currency.is_zero() || force_currency {
            mask |= HOP_CURRENCY;
        }
        if !issuer.is_zero() {
            mask |= HOP_ISSUER;
        }
        PathElement {
            mask,
            account,
            currency,
            issuer,
        }
    }

    /// Build a hop with an explicit mask; fields not named by the mask are
    /// kept but ignored by equality-relevant consumers.
    pub fn with_mask(mask: u8, account: AccountId, currency: Currency, issuer: AccountId) -> Self {
        PathElement {
            mask,
            account,
            currency,
            issuer,
        }
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn issuer(&self) -> AccountId {
        self.issuer
    }

    pub fn has_account(&self) -> bool {
        self.mask & HOP_ACCOUNT != 0
    }

    pub fn has_currency(&self) -> bool {
        self.mask & HOP_CURRENCY != 0
    }

    pub fn has_issuer(&self) -> bool {
        self.mask & HOP_ISSUER != 0
    }

    /// A hop with a zero account crosses the order book instead of
    /// routing credit through an account.
    pub fn is_offer(&self) -> bool {
        self.account.is_zero()
    }

    pub fn is_account(&self) -> bool {
        !self.is_offer()
    }

    /// Copy with the issuer dropped from the mask and cleared.
    fn without_issuer(&self) -> Self {
        PathElement {
            mask: self.mask & !HOP_ISSUER,
            issuer: AccountId::ZERO,
            ..*self
        }
    }
}

/// An ordered sequence of hops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<&PathElement> {
        self.elements.get(index)
    }

    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// True iff some hop matches the triple exactly.
    pub fn has_seen(&self, account: AccountId, currency: Currency, issuer: AccountId) -> bool {
        self.elements.iter().any(|e| {
            e.account == account && e.currency == currency && e.issuer == issuer
        })
    }

    /// Reduce an expanded path to canonical form: drop issuer fields that
    /// merely repeat the previous account hop, then collapse hops made
    /// adjacent-identical by the reduction. Applying this to its own output
    /// is a no-op.
    pub fn canonicalized(&self) -> Path {
        let mut out: Vec<PathElement> = Vec::with_capacity(self.elements.len());
        let mut prev_account: Option<AccountId> = None;
        for hop in &self.elements {
            let mut hop = *hop;
            if let Some(prev) = prev_account {
                if hop.has_issuer() && hop.issuer == prev {
                    hop = hop.without_issuer();
                }
            }
            if hop.is_account() {
                prev_account = Some(hop.account);
            }
            if out.last() == Some(&hop) {
                continue;
            }
            out.push(hop);
        }
        Path { elements: out }
    }
}

impl std::ops::Index<usize> for Path {
    type Output = PathElement;

    fn index(&self, index: usize) -> &PathElement {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Zero or more alternative payment paths, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSet {
    paths: Vec<Path>,
}

impl PathSet {
    pub fn new() -> Self {
        PathSet::default()
    }

    pub fn from_paths(paths: Vec<Path>) -> Self {
        PathSet { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Canonicalize every member path.
    pub fn canonicalized(&self) -> PathSet {
        PathSet {
            paths: self.paths.iter().map(Path::canonicalized).collect(),
        }
    }
}

impl std::ops::Index<usize> for PathSet {
    type Output = Path;

    fn index(&self, index: usize) -> &Path {
        &self.paths[index]
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
