//! Stem selector - picks which deposits of one token to withdraw
//!
//! Withdrawing a deposit forfeits its unrealized grown stalk, so the
//! selector walks deposits newest-first (descending stem) and takes the
//! least-grown deposits until the target is covered.

use pinto_common::{AccountId, DepositView, PintoError, Stem, TokenId};

use crate::filter::{FilterParams, LowPriorityMode};
use crate::ledger::DepositInventory;
use crate::plan::ConsumedDeposits;

/// Ordered deposit selection for one token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedDeposits {
    /// Stems in withdrawal order
    pub stems: Vec<Stem>,
    /// Amount taken from each stem, aligned with `stems`
    pub amounts: Vec<u128>,
    /// Sum of `amounts`
    pub total: u128,
}

/// Select deposits of `token` covering up to `target`.
///
/// Deposits are scanned in descending stem order. Each deposit is
/// skipped when its stem falls below the filter's min stem (too much
/// grown stalk), when it is still germinating and the filter excludes
/// germinating deposits, or when it sits in the low-priority band and the
/// mode says `Skip`. With `UseLast`, low-priority deposits are buffered
/// and replayed after the primary pass, preserving their descending-stem
/// order. Amounts already claimed in `consumed` are unavailable.
///
/// Returns a best-effort result: if the eligible deposits cannot cover
/// `target`, everything available is returned with `total < target`. A
/// token with no deposits yields an empty selection, not an error.
///
/// # Arguments
/// * `inventory` - Deposit reads
/// * `owner` - Deposit holder
/// * `token` - Token to select from
/// * `target` - Amount of `token` to cover; must be positive
/// * `filter` - Eligibility and priority rules
/// * `consumed` - Amounts already claimed by composed plans
pub fn select_deposits<I: DepositInventory>(
    inventory: &I,
    owner: &AccountId,
    token: &TokenId,
    target: u128,
    filter: &FilterParams,
    consumed: &ConsumedDeposits,
) -> Result<SelectedDeposits, PintoError> {
    if target == 0 {
        return Err(PintoError::InvalidArgument("target amount must be positive"));
    }
    filter.validate()?;

    let mut deposits = inventory.list_deposits(owner, token);
    if deposits.is_empty() {
        return Ok(SelectedDeposits::default());
    }
    deposits.sort_by(|a, b| b.stem.cmp(&a.stem));

    let bounds = filter.stem_bounds(inventory.stem_tip(token));
    let germinating = inventory.germinating_boundary(token);

    let mut selected = SelectedDeposits::default();
    let mut need = target;
    let mut deferred: Vec<DepositView> = Vec::new();

    for deposit in &deposits {
        if need == 0 {
            break;
        }
        if deposit.stem < bounds.min_stem {
            // Older than the filter allows; everything after this is older still
            break;
        }
        if filter.exclude_germinating && deposit.stem >= germinating {
            continue;
        }
        if deposit.stem > bounds.max_stem {
            match filter.low_priority_mode {
                LowPriorityMode::Skip => continue,
                LowPriorityMode::UseLast => {
                    deferred.push(*deposit);
                    continue;
                }
                LowPriorityMode::Use => {}
            }
        }
        take_from(deposit, token, consumed, &mut selected, &mut need)?;
    }

    if need > 0 && !deferred.is_empty() {
        log::debug!(
            "selector: replaying {} low-priority deposits",
            deferred.len()
        );
        for deposit in &deferred {
            if need == 0 {
                break;
            }
            take_from(deposit, token, consumed, &mut selected, &mut need)?;
        }
    }

    Ok(selected)
}

fn take_from(
    deposit: &DepositView,
    token: &TokenId,
    consumed: &ConsumedDeposits,
    selected: &mut SelectedDeposits,
    need: &mut u128,
) -> Result<(), PintoError> {
    let remaining = deposit
        .amount
        .saturating_sub(consumed.claimed(token, deposit.stem));
    if remaining == 0 {
        return Ok(());
    }

    let take = remaining.min(*need);
    selected.stems.push(deposit.stem);
    selected.amounts.push(take);
    selected.total = selected
        .total
        .checked_add(take)
        .ok_or(PintoError::Overflow)?;
    *need -= take;
    Ok(())
}
