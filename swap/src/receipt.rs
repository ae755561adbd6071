//! Swap receipts.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tokenswap_common::{AccountId, Amount, SwapDirection, SwapId};

use crate::fee_math::Quote;

/// Represents a completed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Unique swap ID.
    pub id: SwapId,
    /// Conversion direction.
    pub direction: SwapDirection,
    /// Account that surrendered and received funds.
    pub initiator: AccountId,
    /// Amount debited, source units.
    pub amount_in: Amount,
    /// Part of the input withheld as fee, source units.
    pub fee: Amount,
    /// Amount credited, destination units.
    pub amount_out: Amount,
    /// When the swap was executed.
    pub executed_at: DateTime<Utc>,
}

impl SwapReceipt {
    /// Create a receipt for an executed quote.
    pub fn new(id: SwapId, initiator: AccountId, quote: &Quote) -> Self {
        Self {
            id,
            direction: quote.direction,
            initiator,
            amount_in: quote.amount_in,
            fee: quote.fee,
            amount_out: quote.amount_out,
            executed_at: Utc::now(),
        }
    }

    /// Output per unit of input, fees included.
    ///
    /// Returns `None` when either amount does not fit a `Decimal`.
    pub fn effective_rate(&self) -> Option<Decimal> {
        if self.amount_in == 0 {
            return Some(Decimal::ZERO);
        }
        let out = Decimal::from_u128(self.amount_out)?;
        let inp = Decimal::from_u128(self.amount_in)?;
        out.checked_div(inp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(direction: SwapDirection, amount_in: Amount, fee: Amount, amount_out: Amount) -> Quote {
        Quote {
            direction,
            amount_in,
            fee,
            net_in: amount_in - fee,
            amount_out,
        }
    }

    #[test]
    fn test_receipt_from_quote() {
        let q = quote(SwapDirection::AtoB, 300, 30, 90);
        let receipt = SwapReceipt::new(SwapId::new(), AccountId::new("alice"), &q);

        assert_eq!(receipt.direction, SwapDirection::AtoB);
        assert_eq!(receipt.amount_in, 300);
        assert_eq!(receipt.fee, 30);
        assert_eq!(receipt.amount_out, 90);
    }

    #[test]
    fn test_effective_rate() {
        let a_to_b = SwapReceipt::new(SwapId::new(), AccountId::new("alice"), &quote(SwapDirection::AtoB, 300, 30, 90));
        assert_eq!(a_to_b.effective_rate(), Some(dec!(0.3)));

        let b_to_a = SwapReceipt::new(SwapId::new(), AccountId::new("alice"), &quote(SwapDirection::BtoA, 100, 0, 300));
        assert_eq!(b_to_a.effective_rate(), Some(dec!(3)));
    }

    #[test]
    fn test_receipt_serializes_full_precision() {
        let q = quote(SwapDirection::AtoB, 300 * 10u128.pow(18), 0, 100 * 10u128.pow(18));
        let receipt = SwapReceipt::new(SwapId::new(), AccountId::new("alice"), &q);

        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"amount_in\":300000000000000000000"));

        let back: SwapReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
