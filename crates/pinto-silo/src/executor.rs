//! Plan executor - turns a finalized plan into ledger mutations
//!
//! Execution follows the plan's stored source order. Base-asset sources
//! withdraw straight to the destination; Well sources are gated by a
//! price-manipulation check, withdrawn to an intermediate holding
//! account, converted to base asset with the plan's value as the minimum
//! output, and forwarded. Any failure aborts the whole call; atomicity of
//! the partial mutations is the hosting ledger's transaction guarantee.

use pinto_common::{AccountId, PintoError, TokenId};

use crate::ledger::{SiloVault, WellAdapter};
use crate::plan::{PlanSource, WithdrawalPlan};

/// Executes withdrawal plans against an injected ledger
pub struct PlanExecutor<'a, L> {
    ledger: &'a mut L,
    base_token: TokenId,
    /// Intermediate account holding Well shares between withdrawal and
    /// liquidity removal
    holding: AccountId,
}

impl<'a, L> PlanExecutor<'a, L>
where
    L: WellAdapter + SiloVault,
{
    pub fn new(ledger: &'a mut L, base_token: TokenId, holding: AccountId) -> Self {
        Self {
            ledger,
            base_token,
            holding,
        }
    }

    /// Execute `plan` for `owner`, routing base asset to `destination`.
    ///
    /// Well sources whose spot price deviates more than
    /// `max_deviation_bps` from the manipulation-resistant reference
    /// abort the whole call with `PriceManipulationDetected` - a hard
    /// abort, never retried. Liquidity removal enforces the plan's
    /// precomputed value as minimum output, so reserve movement between
    /// planning and execution can only pay out more, never less.
    ///
    /// # Returns
    /// * Total base-asset amount delivered to `destination`
    pub fn execute(
        &mut self,
        owner: &AccountId,
        plan: &WithdrawalPlan,
        max_deviation_bps: u64,
        destination: &AccountId,
    ) -> Result<u128, PintoError> {
        plan.validate()?;

        let mut total = 0u128;
        for source in &plan.sources {
            if source.stems.is_empty() {
                continue;
            }
            let realized = if source.token == self.base_token {
                self.ledger.withdraw_deposits(
                    owner,
                    &source.token,
                    &source.stems,
                    &source.amounts,
                    destination,
                )?;
                source.available
            } else {
                self.execute_well_source(owner, source, max_deviation_bps, destination)?
            };
            total = total.checked_add(realized).ok_or(PintoError::Overflow)?;
        }

        log::debug!("executor: delivered {} base asset", total);
        Ok(total)
    }

    fn execute_well_source(
        &mut self,
        owner: &AccountId,
        source: &PlanSource,
        max_deviation_bps: u64,
        destination: &AccountId,
    ) -> Result<u128, PintoError> {
        if !self
            .ledger
            .is_slippage_acceptable(&source.token, max_deviation_bps)
        {
            log::warn!("executor: well price outside slippage bound, aborting");
            return Err(PintoError::PriceManipulationDetected);
        }

        let holding = self.holding;
        self.ledger.withdraw_deposits(
            owner,
            &source.token,
            &source.stems,
            &source.amounts,
            &holding,
        )?;

        let shares = source
            .amounts
            .iter()
            .try_fold(0u128, |sum, amount| sum.checked_add(*amount))
            .ok_or(PintoError::Overflow)?;

        let realized =
            self.ledger
                .remove_liquidity(&source.token, shares, source.available, &holding)?;
        self.ledger
            .transfer(&self.base_token, realized, &holding, destination)?;
        Ok(realized)
    }
}
