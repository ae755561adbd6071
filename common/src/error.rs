//! Error types for TokenSwap.

use crate::{AccountId, Amount, Capability, SwapId, TokenId};
use thiserror::Error;

/// Main error type for swap, configuration and ledger operations.
///
/// Ledger collaborators report through the same enum so their failures reach
/// the caller of a swap unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Zero or otherwise disallowed input amount.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Fee percentage outside `[0, max]`.
    #[error("Fee percentage {value} exceeds maximum {max}")]
    InvalidPercentage { value: u64, max: u64 },

    /// Exchange rate of zero.
    #[error("Rate must be greater than zero")]
    InvalidRate,

    /// Caller lacks the required capability.
    #[error("Account {account} is missing capability {capability}")]
    Unauthorized {
        account: AccountId,
        capability: Capability,
    },

    /// Account balance is below the requested amount.
    #[error("Insufficient balance on {token} for {account}: required {required}, available {available}")]
    InsufficientBalance {
        token: TokenId,
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    /// Spender allowance is below the requested amount.
    #[error("Insufficient allowance on {token} from {owner} to {spender}: required {required}, available {available}")]
    InsufficientAllowance {
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        required: Amount,
        available: Amount,
    },

    /// Checked arithmetic left the representable range.
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// Credit-side ledger refused to mint.
    #[error("Minting {token} is not permitted for {minter}")]
    MintNotPermitted { token: TokenId, minter: AccountId },

    /// Engine or deployment configuration is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A swap's debit could not be reversed after its credit failed.
    #[error("Rollback failed for swap {swap_id}: {reason}")]
    RollbackFailed { swap_id: SwapId, reason: String },
}

impl SwapError {
    /// Shorthand for an [`SwapError::InvalidAmount`].
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        SwapError::InvalidAmount {
            reason: reason.into(),
        }
    }

    /// Whether the error came from a ledger collaborator.
    pub fn is_ledger_error(&self) -> bool {
        matches!(
            self,
            SwapError::InsufficientBalance { .. }
                | SwapError::InsufficientAllowance { .. }
                | SwapError::MintNotPermitted { .. }
        )
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            SwapError::InvalidAmount { .. } => "INVALID_AMOUNT",
            SwapError::InvalidPercentage { .. } => "INVALID_PERCENTAGE",
            SwapError::InvalidRate => "INVALID_RATE",
            SwapError::Unauthorized { .. } => "UNAUTHORIZED",
            SwapError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            SwapError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            SwapError::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
            SwapError::MintNotPermitted { .. } => "MINT_NOT_PERMITTED",
            SwapError::Configuration(_) => "CONFIGURATION_ERROR",
            SwapError::RollbackFailed { .. } => "ROLLBACK_FAILED",
        }
    }
}

/// Result type alias for TokenSwap operations.
pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let allowance = SwapError::InsufficientAllowance {
            token: TokenId::new("TT"),
            owner: AccountId::new("alice"),
            spender: AccountId::new("token-swap"),
            required: 10,
            available: 0,
        };
        let amount = SwapError::invalid_amount("zero");

        assert_eq!(allowance.error_code(), "INSUFFICIENT_ALLOWANCE");
        assert_eq!(amount.error_code(), "INVALID_AMOUNT");
        assert!(allowance.is_ledger_error());
        assert!(!amount.is_ledger_error());
    }

    #[test]
    fn test_error_display() {
        let err = SwapError::Unauthorized {
            account: AccountId::new("mallory"),
            capability: Capability::Admin,
        };
        assert_eq!(
            err.to_string(),
            "Account mallory is missing capability DEFAULT_ADMIN_ROLE"
        );
    }
}
