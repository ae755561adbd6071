//! Admin-gated swap configuration.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use tokenswap_common::{AccountId, Capability, FeePercent, Rate, Result};
use tokenswap_ledger::CapabilityStore;

use crate::access::AccessGuard;

/// Rate and per-direction fees in effect at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapConfiguration {
    /// Units of token A per unit of token B.
    pub rate: Rate,
    /// Fee withheld from the input of an A→B swap.
    pub fee_percent_a: FeePercent,
    /// Fee withheld from the input of a B→A swap.
    pub fee_percent_b: FeePercent,
}

impl SwapConfiguration {
    /// Build a configuration, rejecting fees above 100%.
    pub fn new(rate: Rate, fee_percent_a: FeePercent, fee_percent_b: FeePercent) -> Result<Self> {
        Ok(Self {
            rate,
            fee_percent_a: fee_percent_a.validated()?,
            fee_percent_b: fee_percent_b.validated()?,
        })
    }
}

/// Live configuration shared between the engine and its administrators.
///
/// Writes replace both fees under one write lock, so no reader observes half
/// an update.
pub struct SwapConfig {
    state: RwLock<SwapConfiguration>,
    guard: AccessGuard,
}

impl SwapConfig {
    /// Create the configuration and grant `admin` the admin capability.
    pub async fn new(
        admin: &AccountId,
        rate: Rate,
        fee_percent_a: FeePercent,
        fee_percent_b: FeePercent,
        capabilities: Arc<dyn CapabilityStore>,
    ) -> Result<Self> {
        let initial = SwapConfiguration::new(rate, fee_percent_a, fee_percent_b)?;
        let guard = AccessGuard::new(capabilities);
        guard.grant(admin, Capability::Admin).await;

        info!(
            admin = %admin,
            rate = %initial.rate,
            fee_percent_a = %initial.fee_percent_a,
            fee_percent_b = %initial.fee_percent_b,
            "Swap configuration initialised"
        );

        Ok(Self {
            state: RwLock::new(initial),
            guard,
        })
    }

    /// Replace both fees. Only admins may call this.
    pub async fn set_fees(
        &self,
        caller: &AccountId,
        fee_percent_a: FeePercent,
        fee_percent_b: FeePercent,
    ) -> Result<()> {
        self.guard.require_capability(caller, Capability::Admin).await?;

        let fee_percent_a = fee_percent_a.validated()?;
        let fee_percent_b = fee_percent_b.validated()?;

        {
            let mut state = self.state.write();
            state.fee_percent_a = fee_percent_a;
            state.fee_percent_b = fee_percent_b;
        }

        info!(
            caller = %caller,
            fee_percent_a = %fee_percent_a,
            fee_percent_b = %fee_percent_b,
            "Fees updated"
        );
        Ok(())
    }

    pub fn rate(&self) -> Rate {
        self.state.read().rate
    }

    pub fn fee_percent_a(&self) -> FeePercent {
        self.state.read().fee_percent_a
    }

    pub fn fee_percent_b(&self) -> FeePercent {
        self.state.read().fee_percent_b
    }

    /// Consistent copy of all three values.
    pub fn snapshot(&self) -> SwapConfiguration {
        *self.state.read()
    }

    /// Whether `account` currently holds the admin capability.
    pub async fn is_admin(&self, account: &AccountId) -> bool {
        self.guard.holds(account, Capability::Admin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokenswap_common::{SwapError, PCT_SCALE};
    use tokenswap_ledger::InMemoryCapabilityStore;

    async fn setup() -> (SwapConfig, Arc<InMemoryCapabilityStore>) {
        let store = Arc::new(InMemoryCapabilityStore::new());
        let config = SwapConfig::new(
            &AccountId::new("admin"),
            Rate::new(3).unwrap(),
            FeePercent::ZERO,
            FeePercent::ZERO,
            store.clone(),
        )
        .await
        .unwrap();
        (config, store)
    }

    #[tokio::test]
    async fn test_new_grants_admin() {
        let (config, _) = setup().await;
        assert!(config.is_admin(&AccountId::new("admin")).await);
        assert!(!config.is_admin(&AccountId::new("alice")).await);
        assert_eq!(config.rate().get(), 3);
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_fee() {
        let store = Arc::new(InMemoryCapabilityStore::new());
        let result = SwapConfig::new(
            &AccountId::new("admin"),
            Rate::new(3).unwrap(),
            FeePercent::from_scaled(PCT_SCALE + 1),
            FeePercent::ZERO,
            store.clone(),
        )
        .await;

        assert!(matches!(result, Err(SwapError::InvalidPercentage { .. })));
        assert!(!store.has(&AccountId::new("admin"), Capability::Admin).await);
    }

    #[tokio::test]
    async fn test_set_fees_by_admin() {
        let (config, _) = setup().await;
        let fee_a = FeePercent::from_percent(dec!(10)).unwrap();
        let fee_b = FeePercent::from_percent(dec!(2.5)).unwrap();

        config.set_fees(&AccountId::new("admin"), fee_a, fee_b).await.unwrap();

        assert_eq!(config.fee_percent_a().get(), 1_000_000_000);
        assert_eq!(config.fee_percent_b().get(), 250_000_000);
    }

    #[tokio::test]
    async fn test_set_fees_unauthorized_leaves_config_unchanged() {
        let (config, _) = setup().await;
        let before = config.snapshot();

        let result = config
            .set_fees(&AccountId::new("alice"), FeePercent::MAX, FeePercent::MAX)
            .await;

        assert!(matches!(result, Err(SwapError::Unauthorized { .. })));
        assert_eq!(config.snapshot(), before);
    }

    #[tokio::test]
    async fn test_set_fees_is_both_or_neither() {
        let (config, _) = setup().await;
        let before = config.snapshot();

        let result = config
            .set_fees(
                &AccountId::new("admin"),
                FeePercent::from_whole_percent(10).unwrap(),
                FeePercent::from_scaled(PCT_SCALE + 1),
            )
            .await;

        assert!(matches!(result, Err(SwapError::InvalidPercentage { .. })));
        assert_eq!(config.snapshot(), before);
    }

    #[tokio::test]
    async fn test_revoked_admin_cannot_set_fees() {
        let (config, store) = setup().await;
        let admin = AccountId::new("admin");
        store.revoke(&admin, Capability::Admin);

        let result = config.set_fees(&admin, FeePercent::MAX, FeePercent::ZERO).await;
        assert!(matches!(result, Err(SwapError::Unauthorized { .. })));
    }
}
