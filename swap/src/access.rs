//! Capability checks in front of configuration writes.

use std::sync::Arc;

use tracing::warn;

use tokenswap_common::{AccountId, Capability, Result, SwapError};
use tokenswap_ledger::CapabilityStore;

/// Stateless gate over a [`CapabilityStore`].
///
/// Every check queries the store, so a revoked capability is refused on the
/// very next call.
#[derive(Clone)]
pub struct AccessGuard {
    store: Arc<dyn CapabilityStore>,
}

impl AccessGuard {
    /// Create a guard over `store`.
    pub fn new(store: Arc<dyn CapabilityStore>) -> Self {
        Self { store }
    }

    /// Fail with `Unauthorized` unless `caller` holds `capability`.
    pub async fn require_capability(&self, caller: &AccountId, capability: Capability) -> Result<()> {
        if self.store.has(caller, capability).await {
            return Ok(());
        }

        warn!(caller = %caller, capability = %capability, "Capability check failed");
        Err(SwapError::Unauthorized {
            account: caller.clone(),
            capability,
        })
    }

    /// Whether `account` holds `capability`.
    pub async fn holds(&self, account: &AccountId, capability: Capability) -> bool {
        self.store.has(account, capability).await
    }

    /// Grant `capability` on the underlying store.
    pub(crate) async fn grant(&self, account: &AccountId, capability: Capability) {
        self.store.grant(account, capability).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenswap_ledger::InMemoryCapabilityStore;

    #[tokio::test]
    async fn test_require_capability() {
        let store = Arc::new(InMemoryCapabilityStore::new());
        let guard = AccessGuard::new(store.clone());
        let admin = AccountId::new("admin");

        let denied = guard.require_capability(&admin, Capability::Admin).await;
        assert!(matches!(denied, Err(SwapError::Unauthorized { .. })));

        store.grant(&admin, Capability::Admin).await;
        assert!(guard.require_capability(&admin, Capability::Admin).await.is_ok());
    }

    #[tokio::test]
    async fn test_revocation_takes_effect_immediately() {
        let store = Arc::new(InMemoryCapabilityStore::new());
        let guard = AccessGuard::new(store.clone());
        let admin = AccountId::new("admin");

        guard.grant(&admin, Capability::Admin).await;
        assert!(guard.holds(&admin, Capability::Admin).await);

        store.revoke(&admin, Capability::Admin);
        assert!(guard.require_capability(&admin, Capability::Admin).await.is_err());
    }
}
