//! Fixed-point fee and rate arithmetic.
//!
//! All division rounds toward zero. Whatever is lost to truncation stays with
//! the engine: the fee is floored (the caller keeps the sub-unit fraction of
//! the fee) and the A→B conversion is floored (the caller forfeits the
//! sub-unit fraction of the output).

use serde::{Deserialize, Serialize};

use tokenswap_common::{Amount, FeePercent, Rate, Result, SwapDirection, SwapError, PCT_SCALE};

use crate::config::SwapConfiguration;

/// Breakdown of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Conversion direction.
    pub direction: SwapDirection,
    /// Amount surrendered, source units.
    pub amount_in: Amount,
    /// Part of `amount_in` withheld as fee, source units.
    pub fee: Amount,
    /// `amount_in - fee`, source units.
    pub net_in: Amount,
    /// Amount received, destination units.
    pub amount_out: Amount,
}

/// `floor(amount * fee_percent / PCT_SCALE)`.
///
/// Splitting `amount` into `q * PCT_SCALE + r` keeps every intermediate below
/// `u128::MAX` for any valid fee: `q * fee <= amount` and `r * fee < PCT_SCALE^2`.
pub fn fee_amount(amount: Amount, fee_percent: FeePercent) -> Result<Amount> {
    let fee_percent = fee_percent.validated()?;
    let scale = PCT_SCALE as u128;
    let fee = fee_percent.get() as u128;

    let whole = (amount / scale)
        .checked_mul(fee)
        .ok_or(SwapError::ArithmeticOverflow("fee multiplication overflow"))?;
    let partial = (amount % scale)
        .checked_mul(fee)
        .ok_or(SwapError::ArithmeticOverflow("fee multiplication overflow"))?
        / scale;

    whole
        .checked_add(partial)
        .ok_or(SwapError::ArithmeticOverflow("fee addition overflow"))
}

/// `amount - floor(amount * fee_percent / PCT_SCALE)`.
pub fn apply_fee(amount: Amount, fee_percent: FeePercent) -> Result<Amount> {
    let fee = fee_amount(amount, fee_percent)?;
    amount
        .checked_sub(fee)
        .ok_or(SwapError::ArithmeticOverflow("fee exceeds amount"))
}

/// `floor(amount / rate)`.
pub fn convert_a_to_b(amount: Amount, rate: Rate) -> Amount {
    amount / rate.get()
}

/// `amount * rate`.
pub fn convert_b_to_a(amount: Amount, rate: Rate) -> Result<Amount> {
    amount
        .checked_mul(rate.get())
        .ok_or(SwapError::ArithmeticOverflow("rate multiplication overflow"))
}

/// Compute the full conversion of `amount` in `direction` under `config`.
///
/// The fee for a direction always taxes the input of that direction.
pub fn quote(direction: SwapDirection, amount: Amount, config: &SwapConfiguration) -> Result<Quote> {
    let fee_percent = match direction {
        SwapDirection::AtoB => config.fee_percent_a,
        SwapDirection::BtoA => config.fee_percent_b,
    };

    let fee = fee_amount(amount, fee_percent)?;
    let net_in = amount - fee;
    let amount_out = match direction {
        SwapDirection::AtoB => convert_a_to_b(net_in, config.rate),
        SwapDirection::BtoA => convert_b_to_a(net_in, config.rate)?,
    };

    Ok(Quote {
        direction,
        amount_in: amount,
        fee,
        net_in,
        amount_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pct(whole: u64) -> FeePercent {
        FeePercent::from_whole_percent(whole).unwrap()
    }

    fn config(rate: u128, fee_a: u64, fee_b: u64) -> SwapConfiguration {
        SwapConfiguration::new(Rate::new(rate).unwrap(), pct(fee_a), pct(fee_b)).unwrap()
    }

    #[test]
    fn test_apply_fee() {
        assert_eq!(apply_fee(300, pct(0)).unwrap(), 300);
        assert_eq!(apply_fee(300, pct(10)).unwrap(), 270);
        assert_eq!(apply_fee(300, pct(90)).unwrap(), 30);
        assert_eq!(apply_fee(300, pct(100)).unwrap(), 0);
    }

    #[test]
    fn test_fee_truncates_toward_zero() {
        // 10% of 15 is 1.5, the withheld part floors to 1
        assert_eq!(fee_amount(15, pct(10)).unwrap(), 1);
        assert_eq!(apply_fee(15, pct(10)).unwrap(), 14);
        assert_eq!(fee_amount(9, pct(10)).unwrap(), 0);
    }

    #[test]
    fn test_fee_rejects_invalid_percentage() {
        let too_high = FeePercent::from_scaled(PCT_SCALE + 1);
        assert!(matches!(
            apply_fee(100, too_high),
            Err(SwapError::InvalidPercentage { .. })
        ));
    }

    #[test]
    fn test_fee_on_max_amount_does_not_overflow() {
        assert_eq!(apply_fee(u128::MAX, pct(0)).unwrap(), u128::MAX);
        assert_eq!(apply_fee(u128::MAX, pct(100)).unwrap(), 0);
        assert!(apply_fee(u128::MAX, pct(50)).is_ok());
    }

    #[test]
    fn test_conversions() {
        let rate = Rate::new(3).unwrap();
        assert_eq!(convert_a_to_b(300, rate), 100);
        assert_eq!(convert_a_to_b(302, rate), 100);
        assert_eq!(convert_b_to_a(100, rate).unwrap(), 300);
        assert!(matches!(
            convert_b_to_a(u128::MAX, rate),
            Err(SwapError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn test_quote_taxes_the_input() {
        let q = quote(SwapDirection::AtoB, 300, &config(3, 10, 0)).unwrap();
        assert_eq!(q.fee, 30);
        assert_eq!(q.net_in, 270);
        assert_eq!(q.amount_out, 90);

        let q = quote(SwapDirection::BtoA, 100, &config(3, 0, 10)).unwrap();
        assert_eq!(q.fee, 10);
        assert_eq!(q.net_in, 90);
        assert_eq!(q.amount_out, 270);
    }

    #[test]
    fn test_quote_fixture_scenarios() {
        let cases = [
            (0, 0, 100, 300),
            (10, 0, 90, 300),
            (0, 10, 100, 270),
            (10, 10, 90, 270),
            (90, 90, 10, 30),
        ];

        for (fee_a, fee_b, expect_b, expect_a) in cases {
            let cfg = config(3, fee_a, fee_b);
            assert_eq!(quote(SwapDirection::AtoB, 300, &cfg).unwrap().amount_out, expect_b);
            assert_eq!(quote(SwapDirection::BtoA, 100, &cfg).unwrap().amount_out, expect_a);
        }
    }

    proptest! {
        #[test]
        fn prop_fee_matches_direct_formula(amount in 0u128..=u64::MAX as u128, fee in 0u64..=PCT_SCALE) {
            let direct = amount * fee as u128 / PCT_SCALE as u128;
            prop_assert_eq!(fee_amount(amount, FeePercent::from_scaled(fee)).unwrap(), direct);
        }

        #[test]
        fn prop_fee_never_exceeds_amount(amount in any::<u128>(), fee in 0u64..=PCT_SCALE) {
            let net = apply_fee(amount, FeePercent::from_scaled(fee)).unwrap();
            prop_assert!(net <= amount);
        }

        #[test]
        fn prop_a_to_b_quote_formula(
            amount in 1u128..=u64::MAX as u128,
            rate in 1u128..1_000_000,
            fee_a in 0u64..=PCT_SCALE,
        ) {
            let cfg = SwapConfiguration::new(
                Rate::new(rate).unwrap(),
                FeePercent::from_scaled(fee_a),
                FeePercent::ZERO,
            ).unwrap();
            let expected = (amount - amount * fee_a as u128 / PCT_SCALE as u128) / rate;
            prop_assert_eq!(quote(SwapDirection::AtoB, amount, &cfg).unwrap().amount_out, expected);
        }

        #[test]
        fn prop_b_to_a_quote_formula(
            amount in 1u128..=u64::MAX as u128,
            rate in 1u128..1_000_000,
            fee_b in 0u64..=PCT_SCALE,
        ) {
            let cfg = SwapConfiguration::new(
                Rate::new(rate).unwrap(),
                FeePercent::ZERO,
                FeePercent::from_scaled(fee_b),
            ).unwrap();
            let expected = (amount - amount * fee_b as u128 / PCT_SCALE as u128) * rate;
            prop_assert_eq!(quote(SwapDirection::BtoA, amount, &cfg).unwrap().amount_out, expected);
        }
    }
}
