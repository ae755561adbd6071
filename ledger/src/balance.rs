//! Account balance tracking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokenswap_common::{AccountId, Amount, TokenId};

/// Balance and outstanding allowances of one account on one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account identifier.
    pub account_id: AccountId,
    /// Token.
    pub token: TokenId,
    /// Spendable balance.
    pub balance: Amount,
    /// Amounts this account has approved spenders to move.
    pub allowances: HashMap<AccountId, Amount>,
    /// When this balance was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AccountBalance {
    /// Create a new zero balance.
    pub fn zero(account_id: AccountId, token: TokenId) -> Self {
        Self {
            account_id,
            token,
            balance: 0,
            allowances: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Check if account has sufficient funds for a movement.
    pub fn has_sufficient_funds(&self, amount: Amount) -> bool {
        self.balance >= amount
    }

    /// Allowance granted to `spender`.
    pub fn allowance_for(&self, spender: &AccountId) -> Amount {
        self.allowances.get(spender).copied().unwrap_or(0)
    }

    /// Mark the record as changed.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
