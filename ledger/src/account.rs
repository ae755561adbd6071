//! How a ledger moves value in and out of accounts.

use serde::{Deserialize, Serialize};

/// Supply model of a token ledger, as seen by its operator.
///
/// The operator is the account that spends allowances on behalf of holders
/// (the swap engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyModel {
    /// Debits transfer into the operator's custody; credits pay out of it.
    /// Total supply never changes.
    Custody,
    /// Debits burn; credits mint. Minting requires the operator to hold the
    /// minter role on the ledger.
    MintBurn,
}

impl SupplyModel {
    /// Whether credits create new supply.
    pub fn mints_on_credit(&self) -> bool {
        matches!(self, SupplyModel::MintBurn)
    }

    /// Whether debits destroy supply.
    pub fn burns_on_debit(&self) -> bool {
        matches!(self, SupplyModel::MintBurn)
    }
}
