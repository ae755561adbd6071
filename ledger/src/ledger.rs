//! The token ledger seam consumed by the swap engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokenswap_common::{AccountId, Amount, Result, TokenId};

use crate::journal::EntryType;

/// Proof that a ledger applied one balance movement.
///
/// Handing a receipt back to [`TokenLedger::reverse`] undoes that movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    /// Journal entry that recorded the movement.
    pub entry_id: Uuid,
    /// Token moved.
    pub token: TokenId,
    /// Account whose balance changed.
    pub account: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Amount moved.
    pub amount: Amount,
}

/// Balance-tracking collaborator for one token.
///
/// Implementations decide how a debit leaves an account (transfer into the
/// operator's custody or burn) and how a credit arrives (transfer out of
/// custody or mint). The `check_*` methods must report exactly the error the
/// matching mutation would return, without mutating anything.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Token this ledger tracks.
    fn token_id(&self) -> &TokenId;

    /// Spendable balance of an account.
    async fn balance_of(&self, account: &AccountId) -> Amount;

    /// Check that `debit(account, amount)` would succeed.
    async fn check_debit(&self, account: &AccountId, amount: Amount) -> Result<()>;

    /// Check that `credit(account, amount)` would succeed.
    async fn check_credit(&self, account: &AccountId, amount: Amount) -> Result<()>;

    /// Move `amount` out of `account`.
    async fn debit(&self, account: &AccountId, amount: Amount) -> Result<LedgerReceipt>;

    /// Move `amount` into `account`.
    async fn credit(&self, account: &AccountId, amount: Amount) -> Result<LedgerReceipt>;

    /// Apply the compensating movement for a previously issued receipt.
    async fn reverse(&self, receipt: &LedgerReceipt) -> Result<()>;
}
