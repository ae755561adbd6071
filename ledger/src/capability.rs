//! Role membership store.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use tokenswap_common::{AccountId, Capability};

/// External record of which account holds which capability.
#[async_trait]
pub trait CapabilityStore: Send + Sync {
    /// Whether `account` currently holds `capability`.
    async fn has(&self, account: &AccountId, capability: Capability) -> bool;

    /// Grant `capability` to `account`. Granting twice is a no-op.
    async fn grant(&self, account: &AccountId, capability: Capability);
}

/// Thread-safe in-memory capability store.
#[derive(Default)]
pub struct InMemoryCapabilityStore {
    members: DashMap<AccountId, HashSet<Capability>>,
}

impl InMemoryCapabilityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `capability` from `account`. Returns whether it was held.
    pub fn revoke(&self, account: &AccountId, capability: Capability) -> bool {
        let removed = self
            .members
            .get_mut(account)
            .map(|mut caps| caps.remove(&capability))
            .unwrap_or(false);

        if removed {
            info!(account = %account, capability = %capability, "Capability revoked");
        }
        removed
    }

    /// All accounts holding `capability`, sorted.
    pub fn holders(&self, capability: Capability) -> Vec<AccountId> {
        let mut holders: Vec<AccountId> = self
            .members
            .iter()
            .filter(|entry| entry.value().contains(&capability))
            .map(|entry| entry.key().clone())
            .collect();
        holders.sort();
        holders
    }
}

#[async_trait]
impl CapabilityStore for InMemoryCapabilityStore {
    async fn has(&self, account: &AccountId, capability: Capability) -> bool {
        self.members
            .get(account)
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    async fn grant(&self, account: &AccountId, capability: Capability) {
        let inserted = self
            .members
            .entry(account.clone())
            .or_default()
            .insert(capability);

        if inserted {
            info!(account = %account, capability = %capability, "Capability granted");
        }
    }
}
