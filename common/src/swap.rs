//! Swap request and direction types.

use crate::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a swap converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Surrender token A, receive token B (divide by rate).
    AtoB,
    /// Surrender token B, receive token A (multiply by rate).
    BtoA,
}

impl SwapDirection {
    /// The opposite direction.
    pub fn reverse(&self) -> Self {
        match self {
            SwapDirection::AtoB => SwapDirection::BtoA,
            SwapDirection::BtoA => SwapDirection::AtoB,
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::AtoB => f.write_str("A->B"),
            SwapDirection::BtoA => f.write_str("B->A"),
        }
    }
}

/// A single swap invocation. Lives only for the duration of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Conversion direction.
    pub direction: SwapDirection,
    /// Amount surrendered, in the source token's units.
    pub amount: Amount,
    /// Account whose balances move.
    pub initiator: AccountId,
}

impl SwapRequest {
    /// Create a new swap request.
    pub fn new(direction: SwapDirection, amount: Amount, initiator: AccountId) -> Self {
        Self {
            direction,
            amount,
            initiator,
        }
    }

    /// Request converting token A into token B.
    pub fn a_to_b(initiator: AccountId, amount: Amount) -> Self {
        Self::new(SwapDirection::AtoB, amount, initiator)
    }

    /// Request converting token B into token A.
    pub fn b_to_a(initiator: AccountId, amount: Amount) -> Self {
        Self::new(SwapDirection::BtoA, amount, initiator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_reverse() {
        assert_eq!(SwapDirection::AtoB.reverse(), SwapDirection::BtoA);
        assert_eq!(SwapDirection::BtoA.reverse(), SwapDirection::AtoB);
    }

    #[test]
    fn test_request_serialization() {
        let request = SwapRequest::a_to_b(AccountId::new("alice"), 300);
        let json = serde_json::to_string(&request).unwrap();
        let back: SwapRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
        assert_eq!(back.direction, SwapDirection::AtoB);
    }
}
