//! Source iterator - assembles withdrawal plans across sources
//!
//! Walks candidate sources in strategy order, driving the stem selector
//! directly for the base asset and through pool-share valuation for Well
//! LP tokens, until the target base-asset value is covered or sources run
//! out.

use pinto_common::{AccountId, PintoError, TokenId};

use crate::filter::FilterParams;
use crate::ledger::{DepositInventory, WellAdapter};
use crate::plan::{ConsumedDeposits, PlanSource, WithdrawalPlan};
use crate::selector::select_deposits;
use crate::strategy::{resolve_sources, TokenSelectionStrategy};

/// Plans withdrawals against injected ledger collaborators
pub struct WithdrawalPlanner<'a, I, W> {
    inventory: &'a I,
    wells: &'a W,
    base_token: TokenId,
}

impl<'a, I, W> WithdrawalPlanner<'a, I, W>
where
    I: DepositInventory,
    W: WellAdapter,
{
    pub fn new(inventory: &'a I, wells: &'a W, base_token: TokenId) -> Self {
        Self {
            inventory,
            wells,
            base_token,
        }
    }

    /// Build a withdrawal plan covering up to `target` base-asset value.
    ///
    /// Sources are tried in resolved order until the remaining need is
    /// zero or sources are exhausted. A source yielding nothing is
    /// skipped, not an error. Deposits already allocated by
    /// `prior_plans` are treated as unavailable, so composed planning
    /// passes within one call never double-spend a deposit.
    ///
    /// The result may under-fill: callers decide whether that is
    /// acceptable via [`WithdrawalPlan::ensure_covers`]. Only when every
    /// source yields zero does planning fail, with `NoLiquidityAvailable`.
    ///
    /// # Arguments
    /// * `owner` - Deposit holder
    /// * `strategy` - Source list or derived ordering
    /// * `target` - Base-asset value to cover; must be positive
    /// * `filter` - Eligibility and priority rules
    /// * `prior_plans` - Plans already computed against this snapshot
    pub fn build_plan(
        &self,
        owner: &AccountId,
        strategy: &TokenSelectionStrategy,
        target: u128,
        filter: &FilterParams,
        prior_plans: &[WithdrawalPlan],
    ) -> Result<WithdrawalPlan, PintoError> {
        if target == 0 {
            return Err(PintoError::InvalidArgument("target amount must be positive"));
        }
        filter.validate()?;

        let sources = resolve_sources(self.inventory, self.wells, &self.base_token, strategy, filter)?;
        if sources.is_empty() {
            return Err(PintoError::InvalidArgument("no candidate sources"));
        }

        // Also tracks this plan's own claims, so a token repeated in an
        // explicit source list cannot double-claim a deposit
        let mut consumed = ConsumedDeposits::from_plans(prior_plans);
        let mut plan = WithdrawalPlan::new();
        let mut need = target;

        for source in &sources {
            if need == 0 {
                break;
            }
            let contributed = if *source == self.base_token {
                self.plan_base_source(owner, source, need, filter, &mut consumed, &mut plan)?
            } else {
                self.plan_well_source(owner, source, need, filter, &mut consumed, &mut plan)?
            };
            need = need.saturating_sub(contributed);
        }

        if plan.total_available == 0 {
            log::debug!("planner: no source yielded liquidity");
            return Err(PintoError::NoLiquidityAvailable);
        }
        Ok(plan)
    }

    /// Convenience: total base-asset value withdrawable under `filter`
    pub fn available_value(
        &self,
        owner: &AccountId,
        strategy: &TokenSelectionStrategy,
        filter: &FilterParams,
    ) -> Result<u128, PintoError> {
        match self.build_plan(owner, strategy, u128::MAX, filter, &[]) {
            Ok(plan) => Ok(plan.total_available),
            Err(PintoError::NoLiquidityAvailable) => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn plan_base_source(
        &self,
        owner: &AccountId,
        source: &TokenId,
        need: u128,
        filter: &FilterParams,
        consumed: &mut ConsumedDeposits,
        plan: &mut WithdrawalPlan,
    ) -> Result<u128, PintoError> {
        let selected = select_deposits(self.inventory, owner, source, need, filter, consumed)?;
        if selected.total == 0 {
            log::debug!("planner: base source has no eligible deposits");
            return Ok(0);
        }
        for (stem, amount) in selected.stems.iter().zip(&selected.amounts) {
            consumed.record(source, *stem, *amount);
        }
        let contributed = selected.total;
        plan.push_source(PlanSource {
            token: *source,
            stems: selected.stems,
            amounts: selected.amounts,
            available: contributed,
        })?;
        Ok(contributed)
    }

    fn plan_well_source(
        &self,
        owner: &AccountId,
        source: &TokenId,
        need: u128,
        filter: &FilterParams,
        consumed: &mut ConsumedDeposits,
        plan: &mut WithdrawalPlan,
    ) -> Result<u128, PintoError> {
        let shares_needed = self.pool_shares_for_base(source, need)?;
        if shares_needed == 0 {
            log::debug!("planner: need too small to price in pool shares, skipping well");
            return Ok(0);
        }

        let selected =
            select_deposits(self.inventory, owner, source, shares_needed, filter, consumed)?;
        if selected.total == 0 {
            log::debug!("planner: well source has no eligible deposits");
            return Ok(0);
        }

        // A full fill realizes the need exactly; a partial fill is worth
        // whatever the selected shares redeem for at current reserves.
        let available = if selected.total < shares_needed {
            self.wells.quote_remove_liquidity(source, selected.total)?
        } else {
            need
        };
        if available == 0 {
            log::debug!("planner: selected shares quote to zero, skipping well");
            return Ok(0);
        }
        for (stem, amount) in selected.stems.iter().zip(&selected.amounts) {
            consumed.record(source, *stem, *amount);
        }

        plan.push_source(PlanSource {
            token: *source,
            stems: selected.stems,
            amounts: selected.amounts,
            available,
        })?;
        Ok(available)
    }

    /// Pool-share amount whose removal frees `need` of base asset:
    /// supply at current reserves minus supply after hypothetically
    /// removing `need` from the base reserve.
    ///
    /// A need at or beyond the base reserve cannot be priced; the planner
    /// then requests the owner's entire eligible share balance and relies
    /// on the partial-fill quote for the realizable value.
    fn pool_shares_for_base(&self, well: &TokenId, need: u128) -> Result<u128, PintoError> {
        let reserves = self.wells.reserves(well)?;
        let base = reserves
            .amounts
            .get(reserves.base_index)
            .copied()
            .ok_or(PintoError::InvalidArgument("base reserve index out of range"))?;

        if need >= base {
            return Ok(u128::MAX);
        }

        let supply_now = self
            .wells
            .share_supply_from_reserves(well, &reserves.amounts)?;
        let mut reduced = reserves.amounts.clone();
        reduced[reserves.base_index] = base - need;
        let supply_after = self.wells.share_supply_from_reserves(well, &reduced)?;

        Ok(supply_now.saturating_sub(supply_after))
    }
}
