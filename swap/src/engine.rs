//! The swap engine.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use tokenswap_common::{
    AccountId, Amount, FeePercent, Rate, Result, SwapDirection, SwapError, SwapId, SwapRequest,
};
use tokenswap_ledger::{LedgerReceipt, TokenLedger};

use crate::config::SwapConfig;
use crate::fee_math::{self, Quote};
use crate::metrics::{SwapMetrics, SwapMetricsSnapshot};
use crate::receipt::SwapReceipt;

/// Converts between two tokens at the configured rate.
///
/// Swaps are serialized on an internal lock: the configuration snapshot, both
/// ledger preflights, the debit and the credit of one swap never interleave
/// with another swap on the same engine.
pub struct SwapEngine {
    operator: AccountId,
    config: Arc<SwapConfig>,
    token_a: Arc<dyn TokenLedger>,
    token_b: Arc<dyn TokenLedger>,
    swap_lock: Mutex<()>,
    metrics: SwapMetrics,
}

impl SwapEngine {
    /// Create an engine over two distinct token ledgers.
    ///
    /// `operator` is the engine's own account on both ledgers.
    pub fn new(
        operator: AccountId,
        config: Arc<SwapConfig>,
        token_a: Arc<dyn TokenLedger>,
        token_b: Arc<dyn TokenLedger>,
    ) -> Result<Self> {
        if token_a.token_id() == token_b.token_id() {
            return Err(SwapError::Configuration(format!(
                "token A and token B must differ, both are {}",
                token_a.token_id()
            )));
        }

        info!(
            operator = %operator,
            token_a = %token_a.token_id(),
            token_b = %token_b.token_id(),
            "Swap engine created"
        );

        Ok(Self {
            operator,
            config,
            token_a,
            token_b,
            swap_lock: Mutex::new(()),
            metrics: SwapMetrics::new(),
        })
    }

    /// Surrender `amount` of token A, receive token B. Returns the B credited.
    pub async fn swap_a_to_b(&self, caller: &AccountId, amount: Amount) -> Result<Amount> {
        self.execute(SwapRequest::a_to_b(caller.clone(), amount))
            .await
            .map(|receipt| receipt.amount_out)
    }

    /// Surrender `amount` of token B, receive token A. Returns the A credited.
    pub async fn swap_b_to_a(&self, caller: &AccountId, amount: Amount) -> Result<Amount> {
        self.execute(SwapRequest::b_to_a(caller.clone(), amount))
            .await
            .map(|receipt| receipt.amount_out)
    }

    /// Execute one swap request.
    ///
    /// Every check runs before the first ledger mutation. If the credit leg
    /// fails anyway, the debit is reversed and the credit error returned.
    #[instrument(skip(self, request), fields(
        direction = %request.direction,
        caller = %request.initiator,
        amount_in = %request.amount
    ))]
    pub async fn execute(&self, request: SwapRequest) -> Result<SwapReceipt> {
        self.metrics.swap_attempted();
        let _guard = self.swap_lock.lock().await;

        let swap_id = SwapId::new();
        let caller = &request.initiator;
        let (source, destination) = self.legs(request.direction);

        let quote = match self.prepare(&request, source, destination).await {
            Ok(quote) => quote,
            Err(e) => {
                self.metrics.swap_rejected();
                warn!(swap_id = %swap_id, ledger = e.is_ledger_error(), error = %e, "Swap rejected");
                return Err(e);
            }
        };

        let debit = match source.debit(caller, quote.amount_in).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.metrics.swap_rejected();
                warn!(swap_id = %swap_id, error = %e, "Debit refused");
                return Err(e);
            }
        };

        if let Err(credit_error) = destination.credit(caller, quote.amount_out).await {
            self.metrics.swap_failed();
            return Err(self.roll_back(swap_id, source, &debit, credit_error).await);
        }

        let receipt = SwapReceipt::new(swap_id, caller.clone(), &quote);
        self.metrics
            .swap_succeeded(quote.direction, quote.amount_in, quote.fee, quote.amount_out);

        info!(
            swap_id = %receipt.id,
            fee = %receipt.fee,
            amount_out = %receipt.amount_out,
            "Swap completed"
        );

        Ok(receipt)
    }

    /// Token B a swap of `amount` token A would currently yield.
    ///
    /// A zero result means the swap itself would be refused with
    /// `InvalidAmount`.
    pub fn get_converted_amount_a_to_b(&self, amount: Amount) -> Result<Amount> {
        self.quote(SwapDirection::AtoB, amount).map(|q| q.amount_out)
    }

    /// Token A a swap of `amount` token B would currently yield.
    ///
    /// A zero result means the swap itself would be refused with
    /// `InvalidAmount`.
    pub fn get_converted_amount_b_to_a(&self, amount: Amount) -> Result<Amount> {
        self.quote(SwapDirection::BtoA, amount).map(|q| q.amount_out)
    }

    /// Full breakdown of a swap under the current configuration.
    pub fn quote(&self, direction: SwapDirection, amount: Amount) -> Result<Quote> {
        fee_math::quote(direction, amount, &self.config.snapshot())
    }

    /// Replace both fees. Requires the admin capability.
    pub async fn set_fees(
        &self,
        caller: &AccountId,
        fee_percent_a: FeePercent,
        fee_percent_b: FeePercent,
    ) -> Result<()> {
        self.config.set_fees(caller, fee_percent_a, fee_percent_b).await
    }

    pub fn rate(&self) -> Rate {
        self.config.rate()
    }

    pub fn fee_percent_a(&self) -> FeePercent {
        self.config.fee_percent_a()
    }

    pub fn fee_percent_b(&self) -> FeePercent {
        self.config.fee_percent_b()
    }

    /// Shared configuration handle.
    pub fn config(&self) -> &Arc<SwapConfig> {
        &self.config
    }

    /// The engine's own account on both ledgers.
    pub fn operator(&self) -> &AccountId {
        &self.operator
    }

    pub fn token_a(&self) -> &Arc<dyn TokenLedger> {
        &self.token_a
    }

    pub fn token_b(&self) -> &Arc<dyn TokenLedger> {
        &self.token_b
    }

    pub fn metrics(&self) -> SwapMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn legs(&self, direction: SwapDirection) -> (&dyn TokenLedger, &dyn TokenLedger) {
        match direction {
            SwapDirection::AtoB => (self.token_a.as_ref(), self.token_b.as_ref()),
            SwapDirection::BtoA => (self.token_b.as_ref(), self.token_a.as_ref()),
        }
    }

    async fn prepare(
        &self,
        request: &SwapRequest,
        source: &dyn TokenLedger,
        destination: &dyn TokenLedger,
    ) -> Result<Quote> {
        if request.amount == 0 {
            return Err(SwapError::invalid_amount("amount must be greater than zero"));
        }
        // an operator debit never leaves custody
        if request.initiator == self.operator {
            return Err(SwapError::invalid_amount(format!(
                "swap operator {} cannot swap against itself",
                self.operator
            )));
        }

        let quote = fee_math::quote(request.direction, request.amount, &self.config.snapshot())?;
        if quote.amount_out == 0 {
            return Err(SwapError::invalid_amount(format!(
                "{} of {} converts to zero",
                request.amount,
                source.token_id()
            )));
        }

        source.check_debit(&request.initiator, quote.amount_in).await?;
        destination
            .check_credit(&request.initiator, quote.amount_out)
            .await?;

        Ok(quote)
    }

    async fn roll_back(
        &self,
        swap_id: SwapId,
        source: &dyn TokenLedger,
        debit: &LedgerReceipt,
        credit_error: SwapError,
    ) -> SwapError {
        warn!(swap_id = %swap_id, error = %credit_error, "Credit failed after debit, reversing");

        match source.reverse(debit).await {
            Ok(()) => credit_error,
            Err(reverse_error) => {
                error!(
                    swap_id = %swap_id,
                    token = %debit.token,
                    account = %debit.account,
                    amount = %debit.amount,
                    credit_error = %credit_error,
                    reverse_error = %reverse_error,
                    "Debit reversal failed, balances are inconsistent"
                );
                SwapError::RollbackFailed {
                    swap_id,
                    reason: format!("credit failed ({credit_error}), reversal failed ({reverse_error})"),
                }
            }
        }
    }
}
