//! # Rates and offer crossing
//!
//! A **rate** is the dimensionless price of an offer, `in / out`: smaller is
//! better for the taker. Rates travel as a packed 64-bit word — the biased
//! exponent in the top 8 bits over the 54-bit mantissa — and expand back into
//! amounts denominated in the placeholder unit (`Currency::ONE`,
//! `AccountId::ONE`).
//!
//! Transfer rates are per-issuer fee multipliers in billionths
//! ([`QUALITY_ONE`] = 1.0). [`apply_offer`] consumes an offer at its rate,
//! capped by the funds behind it and the taker's limits, and computes the
//! issuer fee on each leg. Every rounding direction prefers the
//! counterparty: the taker never receives more than exact, and the issuer is
//! never under-charged.

use crate::amount::Amount;
use crate::errors::AmountError;
use crate::ids::{AccountId, Currency};
use std::cmp::Ordering;
use tracing::trace;

/// A transfer rate of exactly 1.0, in billionths.
pub const QUALITY_ONE: u32 = 1_000_000_000;

/// The packed 64-bit encoding of a rate of exactly 1.0.
pub const RATE_ONE: u64 = 0x5503_8D7E_A4C6_8000;

/// Expand a raw billionths rate into the dimensionless amount
/// `(Currency::ONE, AccountId::ONE, rate, -9)`.
pub fn from_rate(rate: u64) -> Result<Amount, AmountError> {
    Amount::new(Currency::ONE, AccountId::ONE, rate, -9, false)
}

/// Pack the price of an offer (`offer_in / offer_out`) into its 64-bit wire
/// form: `exponent + 100` in the top 8 bits, the mantissa below. Returns 0
/// when the price is zero or unrepresentable.
pub fn get_rate(offer_out: &Amount, offer_in: &Amount) -> u64 {
    if offer_out.is_zero() {
        return 0;
    }
    let Ok(rate) = Amount::divide(offer_in, offer_out, Currency::ONE, AccountId::ONE) else {
        return 0;
    };
    if rate.is_zero() {
        return 0;
    }
    let biased = rate.exponent() + 100;
    if !(0..=255).contains(&biased) {
        return 0;
    }
    ((biased as u64) << 56) | rate.mantissa()
}

/// Invert [`get_rate`]: unpack a 64-bit rate into the dimensionless amount.
pub fn set_rate(rate: u64) -> Result<Amount, AmountError> {
    let mantissa = rate & ((1u64 << 56) - 1);
    let exponent = (rate >> 56) as i32 - 100;
    Amount::new(Currency::ONE, AccountId::ONE, mantissa, exponent, false)
}

/// One party's view of a crossing: the funds backing it and the nominal
/// pays/gets of the offer (or the taker's limits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferSide {
    pub funds: Amount,
    pub pays: Amount,
    pub gets: Amount,
}

/// What actually moved when an offer was crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfferCrossing {
    /// What the taker handed to the offer owner (fee excluded).
    pub taker_paid: Amount,
    /// What the taker received (fee excluded).
    pub taker_got: Amount,
    /// Issuer fee on the taker's leg, zero for native.
    pub taker_issuer_fee: Amount,
    /// Issuer fee on the offer owner's leg, zero for native.
    pub offer_issuer_fee: Amount,
    /// True when the offer fully crossed while delivering nothing to the
    /// taker: a dust-unfunded offer that should simply be removed.
    pub dry: bool,
}

/// Cross a standing offer.
///
/// `offer_rate` is the offer's price (`gets / pays`, see [`get_rate`]);
/// `taker_pays_rate` / `offer_pays_rate` are the transfer rates in
/// billionths on the taker's and owner's outbound legs. With `sell` unset
/// the taker's requested `gets` also caps delivery; a seller takes whatever
/// the price yields.
pub fn apply_offer(
    sell: bool,
    taker_pays_rate: u32,
    offer_pays_rate: u32,
    offer_rate: &Amount,
    offer: &OfferSide,
    taker: &OfferSide,
) -> Result<OfferCrossing, AmountError> {
    offer.gets.ensure_comparable(&taker.funds)?;

    // Funds net of issuer transfer fees: spending X removes X * rate from
    // the owner's balance, so only funds / rate can reach the counterparty.
    let offer_funds_available = funds_after_fee(&offer.funds, offer_pays_rate)?;
    let taker_funds_available = funds_after_fee(&taker.funds, taker_pays_rate)?;

    // What the offer can still pay out, and what it would get for that.
    let (offer_pays_available, offer_gets_available) =
        if offer_funds_available.checked_cmp(&offer.pays)? != Ordering::Less {
            // Fully funded: use the nominal amounts untouched.
            (offer.pays, offer.gets)
        } else {
            let gets = Amount::mul_round(
                &offer_funds_available,
                offer_rate,
                offer.gets.currency(),
                offer.gets.issuer(),
                true,
            )?;
            (offer_funds_available, gets)
        };

    let mut taker_paid = if taker.pays.checked_cmp(&offer_gets_available)? == Ordering::Greater {
        offer_gets_available
    } else {
        taker.pays
    };
    if taker_funds_available.checked_cmp(&taker_paid)? == Ordering::Less {
        taker_paid = taker_funds_available;
    }

    // The taker must not receive more than exact: round delivery down.
    let mut taker_got = Amount::div_round(
        &taker_paid,
        offer_rate,
        taker.gets.currency(),
        taker.gets.issuer(),
        false,
    )?;

    if !sell && taker_got.checked_cmp(&taker.gets)? == Ordering::Greater {
        // A buy is capped at what was asked for; reprice the payment, up.
        taker_got = taker.gets;
        taker_paid = Amount::mul_round(
            &taker_got,
            offer_rate,
            taker_paid.currency(),
            taker_paid.issuer(),
            true,
        )?;
        if taker_funds_available.checked_cmp(&taker_paid)? == Ordering::Less {
            taker_paid = taker_funds_available;
            taker_got = Amount::div_round(
                &taker_paid,
                offer_rate,
                taker.gets.currency(),
                taker.gets.issuer(),
                false,
            )?;
        }
    }

    if taker_got.checked_cmp(&offer_pays_available)? == Ordering::Greater {
        // Rounding slack must never pay out more than the offer holds.
        taker_got = offer_pays_available;
    }

    let taker_issuer_fee = leg_fee(&taker_paid, taker_pays_rate)?;
    let offer_issuer_fee = leg_fee(&taker_got, offer_pays_rate)?;

    let fully_crossed = taker_paid.checked_cmp(&offer_gets_available)? != Ordering::Less;
    let dry = fully_crossed && taker_got.is_zero();

    trace!(
        taker_paid = %taker_paid.full_text(),
        taker_got = %taker_got.full_text(),
        dry,
        "offer crossed"
    );

    Ok(OfferCrossing {
        taker_paid,
        taker_got,
        taker_issuer_fee,
        offer_issuer_fee,
        dry,
    })
}

/// How much must be paid into an offer of `offer_in` for `offer_out` to
/// receive `needed`, clamped to the full offer.
pub fn get_pay(
    offer_out: &Amount,
    offer_in: &Amount,
    needed: &Amount,
) -> Result<Amount, AmountError> {
    if offer_out.is_zero() {
        return Ok(offer_in.zero_like());
    }
    if needed.checked_cmp(offer_out)? != Ordering::Less {
        // More than offered: pay the whole input side.
        return Ok(*offer_in);
    }
    let scaled = Amount::multiply(needed, offer_in, offer_in.currency(), offer_in.issuer())?;
    let pay = Amount::divide(&scaled, offer_out, offer_in.currency(), offer_in.issuer())?;
    Ok(if pay.checked_cmp(offer_in)? == Ordering::Greater {
        *offer_in
    } else {
        pay
    })
}

fn funds_after_fee(funds: &Amount, rate: u32) -> Result<Amount, AmountError> {
    if rate == QUALITY_ONE || funds.is_native() {
        return Ok(*funds);
    }
    Amount::divide(funds, &from_rate(rate as u64)?, funds.currency(), funds.issuer())
}

/// Issuer fee charged on top of one leg: `amount * (rate - 1.0)`, rounded
/// up so the issuer is never under-charged. Native legs bear no fee.
fn leg_fee(amount: &Amount, rate: u32) -> Result<Amount, AmountError> {
    if rate <= QUALITY_ONE || amount.is_native() || amount.is_zero() {
        return Ok(amount.zero_like());
    }
    let premium = from_rate((rate - QUALITY_ONE) as u64)?;
    Amount::mul_round(amount, &premium, amount.currency(), amount.issuer(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::from_code("USD").unwrap()
    }

    fn eur() -> Currency {
        Currency::from_code("EUR").unwrap()
    }

    fn gateway() -> AccountId {
        AccountId::from_hex("0102030405060708090A0B0C0D0E0F1011121314").unwrap()
    }

    fn usd_amount(v: u64) -> Amount {
        Amount::new(usd(), gateway(), v, 0, false).unwrap()
    }

    fn eur_amount(v: u64) -> Amount {
        Amount::new(eur(), gateway(), v, 0, false).unwrap()
    }

    #[test]
    fn test_rate_of_one() {
        let one_out = Amount::native(1).unwrap();
        let one_in = Amount::native(1).unwrap();
        assert_eq!(get_rate(&one_out, &one_in), RATE_ONE);
    }

    #[test]
    fn test_rate_roundtrip() {
        let out = usd_amount(3);
        let inp = eur_amount(2);
        let packed = get_rate(&out, &inp);
        let expanded = set_rate(packed).unwrap();
        let direct = Amount::divide(&inp, &out, Currency::ONE, AccountId::ONE).unwrap();
        assert_eq!(expanded, direct);
    }

    #[test]
    fn test_rate_of_zero_out() {
        assert_eq!(get_rate(&usd_amount(0), &eur_amount(2)), 0);
    }

    #[test]
    fn test_from_rate_quality_one() {
        let r = from_rate(QUALITY_ONE as u64).unwrap();
        assert_eq!(r.mantissa(), crate::amount::MIN_MANTISSA);
        assert_eq!(r.exponent(), -15);
    }

    /// An offer selling 100 USD for 100 EUR at par, fully funded; taker
    /// wants half of it.
    #[test]
    fn test_apply_offer_partial_take() {
        let offer = OfferSide {
            funds: usd_amount(500),
            pays: usd_amount(100),
            gets: eur_amount(100),
        };
        let taker = OfferSide {
            funds: eur_amount(50),
            pays: eur_amount(50),
            gets: usd_amount(50),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let x = apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(x.taker_paid, eur_amount(50));
        assert_eq!(x.taker_got, usd_amount(50));
        assert!(x.taker_issuer_fee.is_zero());
        assert!(x.offer_issuer_fee.is_zero());
        assert!(!x.dry);
    }

    /// The offer owner only has 40 USD behind a 100 USD offer.
    #[test]
    fn test_apply_offer_underfunded() {
        let offer = OfferSide {
            funds: usd_amount(40),
            pays: usd_amount(100),
            gets: eur_amount(100),
        };
        let taker = OfferSide {
            funds: eur_amount(1_000),
            pays: eur_amount(100),
            gets: usd_amount(100),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let x = apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(x.taker_got, usd_amount(40));
        assert_eq!(x.taker_paid, eur_amount(40));
        assert!(!x.dry);
    }

    /// A 2:1 price: taker pays 2 EUR per USD received.
    #[test]
    fn test_apply_offer_price() {
        let offer = OfferSide {
            funds: usd_amount(100),
            pays: usd_amount(100),
            gets: eur_amount(200),
        };
        let taker = OfferSide {
            funds: eur_amount(60),
            pays: eur_amount(60),
            gets: usd_amount(30),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let x = apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(x.taker_got, usd_amount(30));
        assert_eq!(x.taker_paid, eur_amount(60));
    }

    /// A buy is capped at the requested gets even when funds allow more.
    #[test]
    fn test_apply_offer_buy_cap() {
        let offer = OfferSide {
            funds: usd_amount(100),
            pays: usd_amount(100),
            gets: eur_amount(100),
        };
        let taker = OfferSide {
            funds: eur_amount(80),
            pays: eur_amount(80),
            gets: usd_amount(10),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let buy = apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(buy.taker_got, usd_amount(10));
        assert_eq!(buy.taker_paid, eur_amount(10));

        let sell = apply_offer(true, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(sell.taker_got, usd_amount(80));
        assert_eq!(sell.taker_paid, eur_amount(80));
    }

    /// A 0.2% transfer rate on the taker's leg charges the issuer fee on
    /// what was actually paid, rounded up.
    #[test]
    fn test_apply_offer_transfer_fee() {
        let offer = OfferSide {
            funds: usd_amount(100),
            pays: usd_amount(100),
            gets: eur_amount(100),
        };
        let taker = OfferSide {
            funds: eur_amount(1_002),
            pays: eur_amount(50),
            gets: usd_amount(50),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let x = apply_offer(false, 1_002_000_000, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert_eq!(x.taker_paid, eur_amount(50));
        // 50 * 0.002 = 0.1 EUR
        let expected_fee = Amount::new(eur(), gateway(), 1, -1, false).unwrap();
        assert_eq!(x.taker_issuer_fee, expected_fee);
        assert!(x.offer_issuer_fee.is_zero());
    }

    /// Offer with zero usable funds crosses dry.
    #[test]
    fn test_apply_offer_dry() {
        let offer = OfferSide {
            funds: usd_amount(0),
            pays: usd_amount(100),
            gets: eur_amount(100),
        };
        let taker = OfferSide {
            funds: eur_amount(50),
            pays: eur_amount(50),
            gets: usd_amount(50),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        let x = apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker).unwrap();
        assert!(x.taker_got.is_zero());
        assert!(x.dry);
    }

    #[test]
    fn test_get_pay() {
        let offer_out = usd_amount(100);
        let offer_in = eur_amount(200);
        // Needing half the output costs half the input.
        let pay = get_pay(&offer_out, &offer_in, &usd_amount(50)).unwrap();
        assert_eq!(pay, eur_amount(100));
        // Needing more than offered costs the whole input.
        let all = get_pay(&offer_out, &offer_in, &usd_amount(500)).unwrap();
        assert_eq!(all, offer_in);
    }

    #[test]
    fn test_cross_currency_funds_mismatch() {
        let offer = OfferSide {
            funds: usd_amount(1),
            pays: usd_amount(1),
            gets: eur_amount(1),
        };
        let taker = OfferSide {
            funds: usd_amount(1),
            pays: eur_amount(1),
            gets: usd_amount(1),
        };
        let rate = Amount::divide(&offer.gets, &offer.pays, Currency::ONE, AccountId::ONE).unwrap();
        assert!(matches!(
            apply_offer(false, QUALITY_ONE, QUALITY_ONE, &rate, &offer, &taker),
            Err(AmountError::TypeMismatch { .. })
        ));
    }
}
