//! In-memory token ledger.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use tokenswap_common::{AccountId, Amount, Result, SwapError, TokenId};

use crate::account::SupplyModel;
use crate::balance::AccountBalance;
use crate::journal::{EntryType, Journal, JournalEntry};
use crate::ledger::{LedgerReceipt, TokenLedger};

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<AccountId, AccountBalance>,
    minters: HashSet<AccountId>,
    journal: Journal,
    total_supply: Amount,
}

/// A thread-safe, in-process ledger for one token.
///
/// Every mutation happens under a single write lock, so a movement and its
/// journal entries are applied together or not at all.
///
/// The journal is never pruned: each movement appends one to three entries
/// for the lifetime of the ledger. Meant for tests and bounded simulations,
/// not long-running processes.
pub struct InMemoryTokenLedger {
    token: TokenId,
    operator: AccountId,
    model: SupplyModel,
    state: RwLock<LedgerState>,
}

impl InMemoryTokenLedger {
    /// Create a new ledger operated by `operator`.
    pub fn new(token: TokenId, operator: AccountId, model: SupplyModel) -> Self {
        Self {
            token,
            operator,
            model,
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Ledger whose operator holds debited funds in custody.
    pub fn custody(token: impl Into<String>, operator: AccountId) -> Self {
        Self::new(TokenId::new(token), operator, SupplyModel::Custody)
    }

    /// Ledger whose operator burns on debit and mints on credit.
    pub fn mint_burn(token: impl Into<String>, operator: AccountId) -> Self {
        Self::new(TokenId::new(token), operator, SupplyModel::MintBurn)
    }

    /// The account that spends allowances on this ledger.
    pub fn operator(&self) -> &AccountId {
        &self.operator
    }

    /// Supply model of this ledger.
    pub fn supply_model(&self) -> SupplyModel {
        self.model
    }

    /// Issue new supply to `to`, outside of any swap.
    pub fn mint(&self, to: &AccountId, amount: Amount) -> Result<()> {
        let mut state = self.state.write();
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow("total supply overflow"))?;
        state.total_supply = supply;

        let after = {
            let record = record_mut(&mut state.accounts, &self.token, to);
            record.balance += amount;
            record.touch();
            record.balance
        };
        state
            .journal
            .record(JournalEntry::credit(self.token.clone(), to.clone(), amount, after));

        info!(token = %self.token, account = %to, amount = %amount, "Minted");
        Ok(())
    }

    /// Let `spender` move up to `amount` out of `owner`'s balance.
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        let mut state = self.state.write();
        let record = record_mut(&mut state.accounts, &self.token, owner);
        record.allowances.insert(spender.clone(), amount);
        record.touch();

        debug!(token = %self.token, owner = %owner, spender = %spender, amount = %amount, "Approved");
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state
            .read()
            .accounts
            .get(owner)
            .map(|r| r.allowance_for(spender))
            .unwrap_or(0)
    }

    /// Current balance of `account`.
    pub fn balance(&self, account: &AccountId) -> Amount {
        balance_in(&self.state.read(), account)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Amount {
        self.state.read().total_supply
    }

    /// Allow `account` to mint.
    pub fn grant_minter(&self, account: &AccountId) {
        if self.state.write().minters.insert(account.clone()) {
            info!(token = %self.token, account = %account, "Minter role granted");
        }
    }

    /// Withdraw `account`'s permission to mint.
    pub fn revoke_minter(&self, account: &AccountId) {
        if self.state.write().minters.remove(account) {
            info!(token = %self.token, account = %account, "Minter role revoked");
        }
    }

    /// Whether `account` may mint.
    pub fn is_minter(&self, account: &AccountId) -> bool {
        self.state.read().minters.contains(account)
    }

    /// Snapshot of the journal.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.state.read().journal.entries().to_vec()
    }

    fn check_debit_in(&self, state: &LedgerState, account: &AccountId, amount: Amount) -> Result<()> {
        let record = state.accounts.get(account);

        if account != &self.operator {
            let allowance = record.map(|r| r.allowance_for(&self.operator)).unwrap_or(0);
            if allowance < amount {
                return Err(SwapError::InsufficientAllowance {
                    token: self.token.clone(),
                    owner: account.clone(),
                    spender: self.operator.clone(),
                    required: amount,
                    available: allowance,
                });
            }
        }

        if !record.map_or(amount == 0, |r| r.has_sufficient_funds(amount)) {
            let available = record.map(|r| r.balance).unwrap_or(0);
            return Err(SwapError::InsufficientBalance {
                token: self.token.clone(),
                account: account.clone(),
                required: amount,
                available,
            });
        }

        Ok(())
    }

    fn check_credit_in(&self, state: &LedgerState, amount: Amount) -> Result<()> {
        match self.model {
            SupplyModel::Custody => {
                let custody = balance_in(state, &self.operator);
                if custody < amount {
                    return Err(SwapError::InsufficientBalance {
                        token: self.token.clone(),
                        account: self.operator.clone(),
                        required: amount,
                        available: custody,
                    });
                }
            }
            SupplyModel::MintBurn => {
                if !state.minters.contains(&self.operator) {
                    return Err(SwapError::MintNotPermitted {
                        token: self.token.clone(),
                        minter: self.operator.clone(),
                    });
                }
                state
                    .total_supply
                    .checked_add(amount)
                    .ok_or(SwapError::ArithmeticOverflow("total supply overflow"))?;
            }
        }
        Ok(())
    }

    /// Move `amount` out of `account`; caller has already checked feasibility.
    fn apply_debit(&self, state: &mut LedgerState, account: &AccountId, amount: Amount) -> Uuid {
        let after = {
            let record = record_mut(&mut state.accounts, &self.token, account);
            if account != &self.operator {
                let remaining = record.allowance_for(&self.operator) - amount;
                record.allowances.insert(self.operator.clone(), remaining);
            }
            record.balance -= amount;
            record.touch();
            record.balance
        };
        let entry_id = state.journal.record(JournalEntry::debit(
            self.token.clone(),
            account.clone(),
            amount,
            after,
        ));

        if self.model.burns_on_debit() {
            state.total_supply -= amount;
        } else {
            self.move_into(state, &self.operator, amount);
        }

        entry_id
    }

    /// Move `amount` into `account`; caller has already checked feasibility.
    fn apply_credit(&self, state: &mut LedgerState, account: &AccountId, amount: Amount) -> Uuid {
        if self.model.mints_on_credit() {
            state.total_supply += amount;
        } else {
            self.move_out_of(state, &self.operator, amount);
        }
        self.move_into(state, account, amount)
    }

    fn move_into(&self, state: &mut LedgerState, account: &AccountId, amount: Amount) -> Uuid {
        let after = {
            let record = record_mut(&mut state.accounts, &self.token, account);
            record.balance += amount;
            record.touch();
            record.balance
        };
        state.journal.record(JournalEntry::credit(
            self.token.clone(),
            account.clone(),
            amount,
            after,
        ))
    }

    fn move_out_of(&self, state: &mut LedgerState, account: &AccountId, amount: Amount) -> Uuid {
        let after = {
            let record = record_mut(&mut state.accounts, &self.token, account);
            record.balance -= amount;
            record.touch();
            record.balance
        };
        state.journal.record(JournalEntry::debit(
            self.token.clone(),
            account.clone(),
            amount,
            after,
        ))
    }

    fn receipt(&self, entry_id: Uuid, account: &AccountId, entry_type: EntryType, amount: Amount) -> LedgerReceipt {
        LedgerReceipt {
            entry_id,
            token: self.token.clone(),
            account: account.clone(),
            entry_type,
            amount,
        }
    }
}

fn balance_in(state: &LedgerState, account: &AccountId) -> Amount {
    state.accounts.get(account).map(|r| r.balance).unwrap_or(0)
}

fn record_mut<'a>(
    accounts: &'a mut HashMap<AccountId, AccountBalance>,
    token: &TokenId,
    account: &AccountId,
) -> &'a mut AccountBalance {
    accounts
        .entry(account.clone())
        .or_insert_with(|| AccountBalance::zero(account.clone(), token.clone()))
}

#[async_trait]
impl TokenLedger for InMemoryTokenLedger {
    fn token_id(&self) -> &TokenId {
        &self.token
    }

    async fn balance_of(&self, account: &AccountId) -> Amount {
        self.balance(account)
    }

    async fn check_debit(&self, account: &AccountId, amount: Amount) -> Result<()> {
        self.check_debit_in(&self.state.read(), account, amount)
    }

    async fn check_credit(&self, _account: &AccountId, amount: Amount) -> Result<()> {
        self.check_credit_in(&self.state.read(), amount)
    }

    async fn debit(&self, account: &AccountId, amount: Amount) -> Result<LedgerReceipt> {
        let mut state = self.state.write();
        self.check_debit_in(&state, account, amount)?;
        let entry_id = self.apply_debit(&mut state, account, amount);

        debug!(token = %self.token, account = %account, amount = %amount, model = ?self.model, "Debited");
        Ok(self.receipt(entry_id, account, EntryType::Debit, amount))
    }

    async fn credit(&self, account: &AccountId, amount: Amount) -> Result<LedgerReceipt> {
        let mut state = self.state.write();
        self.check_credit_in(&state, amount)?;
        let entry_id = self.apply_credit(&mut state, account, amount);

        debug!(token = %self.token, account = %account, amount = %amount, model = ?self.model, "Credited");
        Ok(self.receipt(entry_id, account, EntryType::Credit, amount))
    }

    async fn reverse(&self, receipt: &LedgerReceipt) -> Result<()> {
        if receipt.token != self.token {
            return Err(SwapError::Configuration(format!(
                "receipt for {} presented to ledger {}",
                receipt.token, self.token
            )));
        }

        let mut state = self.state.write();
        let account = &receipt.account;
        let amount = receipt.amount;

        match receipt.entry_type {
            EntryType::Debit => {
                // Put the funds back and restore the allowance the debit consumed.
                match self.model {
                    SupplyModel::Custody => {
                        let custody = balance_in(&state, &self.operator);
                        if custody < amount {
                            return Err(SwapError::InsufficientBalance {
                                token: self.token.clone(),
                                account: self.operator.clone(),
                                required: amount,
                                available: custody,
                            });
                        }
                        self.move_out_of(&mut state, &self.operator, amount);
                    }
                    SupplyModel::MintBurn => {
                        state.total_supply = state
                            .total_supply
                            .checked_add(amount)
                            .ok_or(SwapError::ArithmeticOverflow("total supply overflow"))?;
                    }
                }
                self.move_into(&mut state, account, amount);

                if account != &self.operator {
                    let record = record_mut(&mut state.accounts, &self.token, account);
                    let restored = record.allowance_for(&self.operator).saturating_add(amount);
                    record.allowances.insert(self.operator.clone(), restored);
                }
            }
            EntryType::Credit => {
                let available = balance_in(&state, account);
                if available < amount {
                    return Err(SwapError::InsufficientBalance {
                        token: self.token.clone(),
                        account: account.clone(),
                        required: amount,
                        available,
                    });
                }
                self.move_out_of(&mut state, account, amount);
                match self.model {
                    SupplyModel::Custody => {
                        self.move_into(&mut state, &self.operator, amount);
                    }
                    SupplyModel::MintBurn => state.total_supply -= amount,
                }
            }
        }

        info!(
            token = %self.token,
            account = %account,
            amount = %amount,
            reversed = ?receipt.entry_type,
            "Reversed ledger movement"
        );
        Ok(())
    }
}
