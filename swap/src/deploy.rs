//! Deployment configuration and wiring.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use tokenswap_common::{AccountId, Amount, FeePercent, Rate, Result, SwapError};
use tokenswap_ledger::{InMemoryCapabilityStore, InMemoryTokenLedger};

use crate::config::SwapConfig;
use crate::engine::SwapEngine;

/// Parameters of one deployed swap pair.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Account granted the admin capability.
    pub admin: String,
    /// Custody-model token (token A).
    pub token_a: String,
    /// Mint/burn-model token (token B).
    pub token_b: String,
    /// Engine's own account on both ledgers.
    pub operator: String,
    /// Units of token A per unit of token B.
    pub rate: u128,
    /// A→B fee as a decimal percentage.
    pub fee_percent_a: Decimal,
    /// B→A fee as a decimal percentage.
    pub fee_percent_b: Decimal,
    /// Log level.
    pub log_level: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            admin: "admin".to_string(),
            token_a: "TT".to_string(),
            token_b: "MT".to_string(),
            operator: "token-swap".to_string(),
            rate: 3,
            fee_percent_a: Decimal::ZERO,
            fee_percent_b: Decimal::TEN,
            log_level: "info".to_string(),
        }
    }
}

impl DeployConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(admin) = std::env::var("ADMIN_ADDRESS") {
            config.admin = admin;
        }

        if let Ok(token) = std::env::var("TRANSFER_TOKEN_ADDRESS") {
            config.token_a = token;
        }

        if let Ok(token) = std::env::var("MINTABLE_TOKEN_ADDRESS") {
            config.token_b = token;
        }

        if let Ok(operator) = std::env::var("SWAP_OPERATOR_ADDRESS") {
            config.operator = operator;
        }

        if let Ok(rate) = std::env::var("SWAP_RATE") {
            if let Ok(rate) = rate.parse() {
                config.rate = rate;
            }
        }

        if let Ok(fee) = std::env::var("TRANSFER_TOKEN_FEE_PERCENT") {
            if let Ok(fee) = Decimal::from_str(&fee) {
                config.fee_percent_a = fee;
            }
        }

        if let Ok(fee) = std::env::var("MINTABLE_TOKEN_FEE_PERCENT") {
            if let Ok(fee) = Decimal::from_str(&fee) {
                config.fee_percent_b = fee;
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("Admin address", &self.admin),
            ("Transfer token address", &self.token_a),
            ("Mintable token address", &self.token_b),
            ("Operator address", &self.operator),
        ] {
            if value.is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }

        if self.token_a == self.token_b {
            return Err("Transfer and mintable token addresses must differ".to_string());
        }

        if self.rate == 0 {
            return Err("Swap rate must be greater than zero".to_string());
        }

        FeePercent::from_percent(self.fee_percent_a)
            .map_err(|_| "Transfer Token fee percentage must be between 0 and 100".to_string())?;
        FeePercent::from_percent(self.fee_percent_b)
            .map_err(|_| "Mintable Token fee percentage must be between 0 and 100".to_string())?;

        Ok(())
    }
}

/// A swap engine wired to in-memory collaborators.
///
/// Token A uses the custody model and token B the mint/burn model; the
/// operator is granted the minter role on token B.
pub struct Deployment {
    pub admin: AccountId,
    pub engine: Arc<SwapEngine>,
    pub token_a: Arc<InMemoryTokenLedger>,
    pub token_b: Arc<InMemoryTokenLedger>,
    pub capabilities: Arc<InMemoryCapabilityStore>,
}

impl Deployment {
    /// Validate `config` and build the deployment.
    pub async fn deploy(config: &DeployConfig) -> Result<Self> {
        config.validate().map_err(SwapError::Configuration)?;

        let admin = AccountId::new(config.admin.as_str());
        let operator = AccountId::new(config.operator.as_str());

        let capabilities = Arc::new(InMemoryCapabilityStore::new());
        let swap_config = SwapConfig::new(
            &admin,
            Rate::new(config.rate)?,
            FeePercent::from_percent(config.fee_percent_a)?,
            FeePercent::from_percent(config.fee_percent_b)?,
            capabilities.clone(),
        )
        .await?;

        let token_a = Arc::new(InMemoryTokenLedger::custody(config.token_a.as_str(), operator.clone()));
        let token_b = Arc::new(InMemoryTokenLedger::mint_burn(config.token_b.as_str(), operator.clone()));
        token_b.grant_minter(&operator);

        let engine = SwapEngine::new(
            operator,
            Arc::new(swap_config),
            token_a.clone(),
            token_b.clone(),
        )?;

        info!(
            admin = %admin,
            token_a = %config.token_a,
            token_b = %config.token_b,
            rate = %config.rate,
            "TokenSwap deployed"
        );

        Ok(Self {
            admin,
            engine: Arc::new(engine),
            token_a,
            token_b,
            capabilities,
        })
    }

    /// Give `account` a balance of token A and let the engine spend all of it.
    pub fn fund_a(&self, account: &AccountId, amount: Amount) -> Result<()> {
        self.token_a.mint(account, amount)?;
        let allowance = self.token_a.allowance(account, self.engine.operator());
        self.token_a
            .approve(account, self.engine.operator(), allowance.saturating_add(amount));
        Ok(())
    }

    /// Let the engine spend up to `amount` of `account`'s token B.
    pub fn approve_b(&self, account: &AccountId, amount: Amount) {
        self.token_b.approve(account, self.engine.operator(), amount);
    }
}
