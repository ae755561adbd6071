//! TokenSwap Engine
//!
//! Fixed-rate converter between two fungible tokens.
//!
//! # Features
//!
//! - Per-direction percentage fees with floor rounding
//! - Admin-gated fee configuration
//! - Atomic debit/credit swaps over pluggable ledgers
//! - Side-effect-free quotes that match execution exactly
//!
//! # Example
//!
//! ```rust,ignore
//! use tokenswap_engine::{SwapConfig, SwapEngine};
//!
//! let config = Arc::new(SwapConfig::new(admin, Rate::new(3)?, FeePercent::ZERO, FeePercent::ZERO, store).await?);
//! let engine = SwapEngine::new(operator, config, token_a, token_b)?;
//!
//! assert_eq!(engine.get_converted_amount_a_to_b(300)?, 100);
//! let received = engine.swap_a_to_b(&alice, 300).await?;
//! ```

pub mod fee_math;
pub mod access;
pub mod config;
pub mod engine;
pub mod receipt;
pub mod metrics;
pub mod deploy;

pub use fee_math::Quote;
pub use access::AccessGuard;
pub use config::{SwapConfig, SwapConfiguration};
pub use engine::SwapEngine;
pub use receipt::SwapReceipt;
pub use metrics::{SwapMetrics, SwapMetricsSnapshot};
pub use deploy::{Deployment, DeployConfig};
