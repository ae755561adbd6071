//! Journal entries recording every balance movement on a ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokenswap_common::{AccountId, Amount, TokenId};

/// Type of journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Balance decreased.
    Debit,
    /// Balance increased.
    Credit,
}

/// A single journal entry in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// Token moved.
    pub token: TokenId,
    /// Account affected.
    pub account_id: AccountId,
    /// Entry type (debit or credit).
    pub entry_type: EntryType,
    /// Amount.
    pub amount: Amount,
    /// Balance after this entry.
    pub balance_after: Amount,
    /// When this entry was created.
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a debit entry.
    pub fn debit(token: TokenId, account_id: AccountId, amount: Amount, balance_after: Amount) -> Self {
        Self::new(token, account_id, EntryType::Debit, amount, balance_after)
    }

    /// Create a credit entry.
    pub fn credit(token: TokenId, account_id: AccountId, amount: Amount, balance_after: Amount) -> Self {
        Self::new(token, account_id, EntryType::Credit, amount, balance_after)
    }

    fn new(
        token: TokenId,
        account_id: AccountId,
        entry_type: EntryType,
        amount: Amount,
        balance_after: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            account_id,
            entry_type,
            amount,
            balance_after,
            created_at: Utc::now(),
        }
    }
}

/// Append-only list of journal entries.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its ID.
    pub fn record(&mut self, entry: JournalEntry) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries touching one account.
    pub fn entries_for(&self, account: &AccountId) -> Vec<JournalEntry> {
        self.entries
            .iter()
            .filter(|e| &e.account_id == account)
            .cloned()
            .collect()
    }

    /// Get total debits.
    pub fn total_debits(&self) -> Amount {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| e.amount)
            .sum()
    }

    /// Get total credits.
    pub fn total_credits(&self) -> Amount {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Credit)
            .map(|e| e.amount)
            .sum()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_totals() {
        let token = TokenId::new("TT");
        let alice = AccountId::new("alice");
        let custody = AccountId::new("token-swap");
        let mut journal = Journal::new();

        journal.record(JournalEntry::debit(token.clone(), alice.clone(), 300, 0));
        journal.record(JournalEntry::credit(token, custody, 300, 300));

        assert_eq!(journal.len(), 2);
        assert_eq!(journal.total_debits(), 300);
        assert_eq!(journal.total_credits(), 300);
        assert_eq!(journal.entries_for(&alice).len(), 1);
        assert_eq!(journal.entries_for(&alice)[0].entry_type, EntryType::Debit);
    }
}
