//! # Canonical decimal amounts
//!
//! ## Purpose
//!
//! One type covers both kinds of value the network moves:
//!
//! - **Native** amounts: an unsigned integer count of the intrinsic token's
//!   smallest unit, exponent fixed at zero, bounded by [`MAX_NATIVE`].
//! - **Issued** amounts: a signed base-10 floating-point credit balance in a
//!   third-party currency, mantissa held in `[10^15, 10^16 - 1]`, exponent in
//!   `[-96, +80]`.
//!
//! Every constructor and arithmetic operation re-establishes the canonical
//! form, so two amounts representing the same numeric value always carry the
//! same `(mantissa, exponent, sign)` triple and hash/serialize identically.
//!
//! ## Precision and rounding
//!
//! Plain `checked_add`/`checked_sub`/`multiply`/`divide` truncate toward zero
//! on any digit drop. The `*_round` variants take a `round_up` flag: when the
//! final digit drop discarded nonzero digits and the requested direction
//! matches the result's sign, the truncated mantissa is bumped by one. This
//! is how offer crossing steers every precision loss toward the counterparty.
//!
//! Intermediate products and scaled dividends run on `u128`, which comfortably
//! holds `mantissa * mantissa` and `mantissa * 10^17`.
//!
//! ## Comparability
//!
//! Native compares with native; issued compares with issued of the same
//! currency. The issuer is a provenance tag, not part of numeric identity:
//! `==` and ordering ignore it. Cross-currency comparison is an error
//! (`checked_cmp`) or `None` (`partial_cmp`), never a silent answer.

use crate::errors::AmountError;
use crate::ids::{AccountId, Currency};
use serde_json::json;
use std::cmp::Ordering;
use std::fmt;

/// Smallest canonical mantissa of a nonzero issued amount (10^15).
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
/// Largest canonical mantissa of an issued amount (10^16 - 1).
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
/// Smallest canonical exponent of a nonzero issued amount.
pub const MIN_EXPONENT: i32 = -96;
/// Largest canonical exponent of an issued amount.
pub const MAX_EXPONENT: i32 = 80;
/// Exponent carried by an issued zero, by convention.
pub const ZERO_EXPONENT: i32 = -100;
/// Largest representable native mantissa.
pub const MAX_NATIVE: u64 = 9_000_000_000_000_000_000;
/// Cap on native amounts that may appear on the network (exclusive).
pub const MAX_NATIVE_NETWORK: u64 = 100_000_000_000_000_000;

/// A canonical native or issued amount.
///
/// The invariants of the canonical form hold at all times between calls:
/// natives have exponent zero and a zero issuer, issued zeros carry
/// exponent -100 and a positive sign, nonzero issued mantissas sit in the
/// canonical band.
#[derive(Clone, Copy, Debug)]
pub struct Amount {
    currency: Currency,
    issuer: AccountId,
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl Default for Amount {
    /// The native zero.
    fn default() -> Self {
        Amount {
            currency: Currency::XRP,
            issuer: AccountId::ZERO,
            mantissa: 0,
            exponent: 0,
            negative: false,
        }
    }
}

impl Amount {
    /// A native amount from a raw unit count.
    pub fn native(units: u64) -> Result<Self, AmountError> {
        if units > MAX_NATIVE {
            return Err(AmountError::Overflow);
        }
        Ok(Amount {
            mantissa: units,
            ..Amount::default()
        })
    }

    /// A native amount from a signed unit count.
    pub fn native_signed(units: i64) -> Result<Self, AmountError> {
        let magnitude = units.unsigned_abs();
        if magnitude > MAX_NATIVE {
            return Err(AmountError::Overflow);
        }
        Ok(Amount {
            mantissa: magnitude,
            negative: units < 0 && magnitude != 0,
            ..Amount::default()
        })
    }

    /// Build and canonicalize an amount. A zero currency makes it native
    /// (the issuer is then cleared); anything else is issued.
    pub fn new(
        currency: Currency,
        issuer: AccountId,
        mantissa: u64,
        exponent: i32,
        negative: bool,
    ) -> Result<Self, AmountError> {
        Self::from_parts(currency, issuer, mantissa as u128, exponent, negative, None, false)
    }

    /// The zero of the given unit, native or issued.
    pub fn zero(currency: Currency, issuer: AccountId) -> Self {
        if currency.is_native() {
            Amount::default()
        } else {
            Amount {
                currency,
                issuer,
                mantissa: 0,
                exponent: ZERO_EXPONENT,
                negative: false,
            }
        }
    }

    /// The zero carrying this amount's currency and issuer.
    pub fn zero_like(&self) -> Self {
        Amount::zero(self.currency, self.issuer)
    }

    /// Reset to zero in place, keeping currency and issuer.
    pub fn set_zero(&mut self) {
        *self = self.zero_like();
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn issuer(&self) -> AccountId {
        self.issuer
    }

    pub fn set_issuer(&mut self, issuer: AccountId) {
        self.issuer = issuer;
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_native(&self) -> bool {
        self.currency.is_native()
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && self.mantissa != 0
    }

    /// Whether a native amount is small enough to appear on the network.
    /// Issued amounts always pass.
    pub fn is_legal_net(&self) -> bool {
        !self.is_native() || self.mantissa < MAX_NATIVE_NETWORK
    }

    /// Flip the sign of a nonzero amount; zero stays positive.
    pub fn negate(&mut self) {
        if self.mantissa != 0 {
            self.negative = !self.negative;
        }
    }

    /// A copy with the sign flipped.
    pub fn negated(&self) -> Self {
        let mut out = *self;
        out.negate();
        out
    }

    /// Signed unit count of a native amount.
    pub fn signed_native(&self) -> Result<i64, AmountError> {
        if !self.is_native() {
            return Err(AmountError::NotNative);
        }
        let magnitude = self.mantissa as i64;
        Ok(if self.negative { -magnitude } else { magnitude })
    }

    /// Replace the unit count of a native amount.
    pub fn set_signed_native(&mut self, units: i64) -> Result<(), AmountError> {
        if !self.is_native() {
            return Err(AmountError::NotNative);
        }
        *self = Amount::native_signed(units)?;
        Ok(())
    }

    /// Native-to-native always compares; issued-to-issued compares when the
    /// currencies match. The issuer never participates.
    pub fn is_comparable(&self, other: &Amount) -> bool {
        self.is_native() == other.is_native()
            && (self.is_native() || self.currency == other.currency)
    }

    pub(crate) fn ensure_comparable(&self, other: &Amount) -> Result<(), AmountError> {
        if self.is_comparable(other) {
            return Ok(());
        }
        Err(AmountError::TypeMismatch {
            lhs: self.unit_text(),
            rhs: other.unit_text(),
        })
    }

    /// Total order over comparable amounts; errors on a unit mismatch.
    pub fn checked_cmp(&self, other: &Amount) -> Result<Ordering, AmountError> {
        self.ensure_comparable(other)?;
        Ok(self.cmp_magnitudes(other))
    }

    /// Sign first, then magnitude. Canonical form makes `(exponent,
    /// mantissa)` lexicographic order correct for issued magnitudes.
    fn cmp_magnitudes(&self, other: &Amount) -> Ordering {
        if self.negative != other.negative {
            return if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if self.mantissa == 0 {
            return if other.negative {
                Ordering::Greater
            } else if other.mantissa != 0 {
                Ordering::Less
            } else {
                Ordering::Equal
            };
        }
        if other.mantissa == 0 {
            return if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        let magnitude = (self.exponent, self.mantissa).cmp(&(other.exponent, other.mantissa));
        if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Truncating addition; both operands must be comparable.
    pub fn checked_add(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.add_inner(other, None)
    }

    /// Addition with directed rounding of any precision loss.
    pub fn checked_add_round(&self, other: &Amount, round_up: bool) -> Result<Amount, AmountError> {
        self.add_inner(other, Some(round_up))
    }

    /// Truncating subtraction; both operands must be comparable.
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.add_inner(&other.negated(), None)
    }

    /// Subtraction with directed rounding of any precision loss.
    pub fn checked_sub_round(&self, other: &Amount, round_up: bool) -> Result<Amount, AmountError> {
        self.add_inner(&other.negated(), Some(round_up))
    }

    fn add_inner(&self, other: &Amount, round_up: Option<bool>) -> Result<Amount, AmountError> {
        self.ensure_comparable(other)?;
        if other.mantissa == 0 {
            return Ok(*self);
        }
        if self.mantissa == 0 {
            // Keep our unit, take the other side's magnitude.
            return Self::from_parts(
                self.currency,
                self.issuer,
                other.mantissa as u128,
                other.exponent,
                other.negative,
                round_up,
                false,
            );
        }
        if self.is_native() {
            let sum = self
                .signed_native()?
                .checked_add(other.signed_native()?)
                .ok_or(AmountError::Overflow)?;
            return Amount::native_signed(sum);
        }

        // Align to the larger exponent, truncating the smaller side.
        let mut lost = false;
        let mut align = |value: &mut i128, exp: &mut i32, target: i32| {
            while *exp < target {
                if *value % 10 != 0 {
                    lost = true;
                }
                *value /= 10;
                *exp += 1;
            }
        };
        let (mut v1, mut e1) = (self.signed_mantissa(), self.exponent);
        let (mut v2, mut e2) = (other.signed_mantissa(), other.exponent);
        let target = e1.max(e2);
        align(&mut v1, &mut e1, target);
        align(&mut v2, &mut e2, target);

        let sum = v1 + v2;
        Self::from_parts(
            self.currency,
            self.issuer,
            sum.unsigned_abs(),
            target,
            sum < 0,
            round_up,
            lost,
        )
    }

    fn signed_mantissa(&self) -> i128 {
        let magnitude = self.mantissa as i128;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Truncating product. The result's currency and issuer come from the
    /// caller, enabling unit-bearing arithmetic.
    pub fn multiply(
        a: &Amount,
        b: &Amount,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Amount, AmountError> {
        Self::mul_inner(a, b, currency, issuer, None)
    }

    /// Product with directed rounding of the final digit drop.
    pub fn mul_round(
        a: &Amount,
        b: &Amount,
        currency: Currency,
        issuer: AccountId,
        round_up: bool,
    ) -> Result<Amount, AmountError> {
        Self::mul_inner(a, b, currency, issuer, Some(round_up))
    }

    fn mul_inner(
        a: &Amount,
        b: &Amount,
        currency: Currency,
        issuer: AccountId,
        round_up: Option<bool>,
    ) -> Result<Amount, AmountError> {
        if a.mantissa == 0 || b.mantissa == 0 {
            return Ok(Amount::zero(currency, issuer));
        }
        let negative = a.negative != b.negative;
        if a.is_native() && b.is_native() && currency.is_native() {
            let product = a.mantissa as u128 * b.mantissa as u128;
            return Self::from_parts(currency, issuer, product, 0, negative, round_up, false);
        }
        let (m1, e1) = a.float_parts();
        let (m2, e2) = b.float_parts();
        let product = m1 as u128 * m2 as u128;
        Self::from_parts(currency, issuer, product, e1 + e2, negative, round_up, false)
    }

    /// Truncating quotient: `(mantissa_a * 10^17) / mantissa_b` at exponent
    /// `exp_a - exp_b - 17`, re-canonicalized. The result's unit comes from
    /// the caller. Fails on a zero divisor.
    pub fn divide(
        num: &Amount,
        den: &Amount,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Amount, AmountError> {
        Self::div_inner(num, den, currency, issuer, None)
    }

    /// Quotient with directed rounding of the final digit drop.
    pub fn div_round(
        num: &Amount,
        den: &Amount,
        currency: Currency,
        issuer: AccountId,
        round_up: bool,
    ) -> Result<Amount, AmountError> {
        Self::div_inner(num, den, currency, issuer, Some(round_up))
    }

    fn div_inner(
        num: &Amount,
        den: &Amount,
        currency: Currency,
        issuer: AccountId,
        round_up: Option<bool>,
    ) -> Result<Amount, AmountError> {
        if den.mantissa == 0 {
            return Err(AmountError::DivideByZero);
        }
        if num.mantissa == 0 {
            return Ok(Amount::zero(currency, issuer));
        }
        let negative = num.negative != den.negative;
        let (nm, ne) = num.float_parts();
        let (dm, de) = den.float_parts();
        let dividend = nm as u128 * 10u128.pow(17);
        let quotient = dividend / dm as u128;
        let lost = dividend % dm as u128 != 0;
        Self::from_parts(currency, issuer, quotient, ne - de - 17, negative, round_up, lost)
    }

    /// Mantissa/exponent view with native counts lifted into the issued
    /// mantissa band, so products and quotients mix freely.
    fn float_parts(&self) -> (u64, i32) {
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        if self.is_native() {
            while mantissa < MIN_MANTISSA {
                mantissa *= 10;
                exponent -= 1;
            }
        }
        (mantissa, exponent)
    }

    /// Canonicalize `mantissa * 10^exponent` into an `Amount`.
    ///
    /// `round_up` of `None` truncates toward zero. Otherwise, when `lost`
    /// (or any digit dropped here) is nonzero and the requested direction
    /// matches the sign, the final mantissa is bumped by one.
    fn from_parts(
        currency: Currency,
        issuer: AccountId,
        mantissa: u128,
        exponent: i32,
        negative: bool,
        round_up: Option<bool>,
        mut lost: bool,
    ) -> Result<Amount, AmountError> {
        let bump = |lost: bool| match round_up {
            Some(up) => lost && up != negative,
            None => false,
        };

        if currency.is_native() {
            let mut m = mantissa;
            let mut e = exponent;
            while e < 0 {
                if m % 10 != 0 {
                    lost = true;
                }
                m /= 10;
                e += 1;
            }
            while e > 0 && m != 0 {
                m = m.checked_mul(10).ok_or(AmountError::Overflow)?;
                if m > MAX_NATIVE as u128 {
                    return Err(AmountError::Overflow);
                }
                e -= 1;
            }
            if bump(lost) {
                m += 1;
            }
            if m == 0 {
                return Ok(Amount::default());
            }
            if m > MAX_NATIVE as u128 {
                return Err(AmountError::Overflow);
            }
            return Ok(Amount {
                currency: Currency::XRP,
                issuer: AccountId::ZERO,
                mantissa: m as u64,
                exponent: 0,
                negative,
            });
        }

        if currency.is_bad() {
            return Err(AmountError::ReservedCurrency);
        }
        if mantissa == 0 {
            return Ok(Amount::zero(currency, issuer));
        }
        let mut m = mantissa;
        let mut e = exponent;
        while m < MIN_MANTISSA as u128 && e > MIN_EXPONENT {
            m *= 10;
            e -= 1;
        }
        while m > MAX_MANTISSA as u128 {
            if e >= MAX_EXPONENT {
                return Err(AmountError::Overflow);
            }
            if m % 10 != 0 {
                lost = true;
            }
            m /= 10;
            e += 1;
        }
        if bump(lost) {
            m += 1;
            if m > MAX_MANTISSA as u128 {
                // 10^16 collapses back to 10^15 exactly.
                m /= 10;
                e += 1;
            }
        }
        if e < MIN_EXPONENT || m < MIN_MANTISSA as u128 {
            // Underflow is a clean zero, not an error.
            return Ok(Amount::zero(currency, issuer));
        }
        if e > MAX_EXPONENT {
            return Err(AmountError::Overflow);
        }
        Ok(Amount {
            currency,
            issuer,
            mantissa: m as u64,
            exponent: e,
            negative,
        })
    }

    fn unit_text(&self) -> String {
        self.currency.code()
    }

    /// Value only: decimal integer for native; for issued, a plain decimal
    /// when the exponent sits in the readable window, scientific otherwise.
    pub fn text(&self) -> String {
        if self.mantissa == 0 {
            return "0".to_string();
        }
        let sign = if self.negative { "-" } else { "" };
        if self.is_native() {
            return format!("{sign}{}", self.mantissa);
        }
        if !(-25..=-5).contains(&self.exponent) {
            return format!("{sign}{}e{}", self.mantissa, self.exponent);
        }
        let digits = self.mantissa.to_string();
        let point = digits.len() as i32 + self.exponent;
        let rendered = if point <= 0 {
            let mut s = String::from("0.");
            s.extend(std::iter::repeat('0').take(-point as usize));
            s.push_str(&digits);
            s
        } else {
            let (int_part, frac_part) = digits.split_at(point as usize);
            format!("{int_part}.{frac_part}")
        };
        let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
        format!("{sign}{rendered}")
    }

    /// Value with its unit: `<text>/XRP` or `<text>/<code>/<issuer-hex>`.
    pub fn full_text(&self) -> String {
        if self.is_native() {
            format!("{}/XRP", self.text())
        } else {
            format!("{}/{}/{}", self.text(), self.currency.code(), self.issuer)
        }
    }

    /// Structured rendering: issued amounts become `{value, currency,
    /// issuer}` objects, native amounts a bare string.
    pub fn json(&self) -> serde_json::Value {
        if self.is_native() {
            json!(self.text())
        } else {
            json!({
                "value": self.text(),
                "currency": self.currency.code(),
                "issuer": self.issuer.to_string(),
            })
        }
    }
}

impl PartialEq for Amount {
    /// Numeric identity: unit, sign, exponent and mantissa. The issuer is a
    /// provenance tag and does not participate.
    fn eq(&self, other: &Self) -> bool {
        self.is_comparable(other)
            && self.negative == other.negative
            && self.exponent == other.exponent
            && self.mantissa == other.mantissa
    }
}

impl PartialOrd for Amount {
    /// `None` when the amounts are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.is_comparable(other) {
            return None;
        }
        Some(self.cmp_magnitudes(other))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text())
    }
}
