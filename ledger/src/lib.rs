//! TokenSwap Ledger Collaborators
//!
//! The swap engine never keeps balances itself. It consumes a [`TokenLedger`]
//! per token and a [`CapabilityStore`] for role membership. This crate defines
//! those seams and ships in-memory implementations used by tests and the
//! simulator.

pub mod ledger;
pub mod capability;
pub mod engine;
pub mod account;
pub mod journal;
pub mod balance;

pub use ledger::{LedgerReceipt, TokenLedger};
pub use capability::{CapabilityStore, InMemoryCapabilityStore};
pub use engine::InMemoryTokenLedger;
pub use account::SupplyModel;
pub use journal::{EntryType, JournalEntry};
pub use balance::AccountBalance;
