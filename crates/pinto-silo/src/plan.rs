//! Withdrawal plans and cross-plan consumption bookkeeping

use std::collections::{HashMap, HashSet};

use pinto_common::{AccountId, PintoError, Stem, TokenId};
use serde::{Deserialize, Serialize};

use crate::ledger::DepositInventory;

/// One source's share of a withdrawal plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSource {
    /// Source token (base asset or Well LP)
    pub token: TokenId,
    /// Stems to withdraw, in withdrawal order
    pub stems: Vec<Stem>,
    /// Amount to take from each stem, aligned with `stems`
    pub amounts: Vec<u128>,
    /// Base-asset value this source contributes
    pub available: u128,
}

/// An immutable allocation decision: which deposits to withdraw to
/// satisfy a target amount of base-asset value.
///
/// A plan never touches the ledger by itself; it becomes effective only
/// when handed to the executor. Consumers must withdraw stems in the
/// stored order, since on-ledger withdrawal of multiple stems for one
/// token is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalPlan {
    pub sources: Vec<PlanSource>,
    /// Sum of `available` across sources
    pub total_available: u128,
}

impl WithdrawalPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source entry, keeping `total_available` in sync
    pub fn push_source(&mut self, source: PlanSource) -> Result<(), PintoError> {
        if source.stems.len() != source.amounts.len() {
            return Err(PintoError::InvalidArgument(
                "plan source stems/amounts misaligned",
            ));
        }
        self.total_available = self
            .total_available
            .checked_add(source.available)
            .ok_or(PintoError::Overflow)?;
        self.sources.push(source);
        Ok(())
    }

    /// Caller-side under-fill check: planning returns best-effort plans,
    /// rejecting one that does not cover the required amount is the
    /// caller's decision.
    pub fn ensure_covers(&self, required: u128) -> Result<(), PintoError> {
        if self.total_available < required {
            return Err(PintoError::InsufficientFunds {
                required,
                available: self.total_available,
            });
        }
        Ok(())
    }

    /// Check the plan's structural invariants: stems/amounts aligned per
    /// source, no stem repeated for one token, totals consistent.
    pub fn validate(&self) -> Result<(), PintoError> {
        let mut seen: HashSet<(TokenId, Stem)> = HashSet::new();
        let mut sum: u128 = 0;

        for source in &self.sources {
            if source.stems.len() != source.amounts.len() {
                return Err(PintoError::InvalidArgument(
                    "plan source stems/amounts misaligned",
                ));
            }
            for stem in &source.stems {
                if !seen.insert((source.token, *stem)) {
                    return Err(PintoError::InvalidArgument(
                        "stem referenced twice for one token",
                    ));
                }
            }
            sum = sum
                .checked_add(source.available)
                .ok_or(PintoError::Overflow)?;
        }

        if sum != self.total_available {
            return Err(PintoError::InvalidArgument(
                "plan total does not match source sum",
            ));
        }
        Ok(())
    }
}

/// Per-(token, stem) amounts already claimed by previously computed
/// plans.
///
/// Composing several planning passes within one call must not allocate
/// the same deposit twice; the selector subtracts these claims from every
/// deposit it scans. This protection is scoped to a single call's
/// composed plans, it is not a cross-transaction lock.
#[derive(Debug, Clone, Default)]
pub struct ConsumedDeposits {
    claimed: HashMap<(TokenId, Stem), u128>,
}

impl ConsumedDeposits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the deposit-level consumption of prior plans
    pub fn from_plans<'a, P>(plans: P) -> Self
    where
        P: IntoIterator<Item = &'a WithdrawalPlan>,
    {
        let mut consumed = Self::new();
        for plan in plans {
            for source in &plan.sources {
                for (stem, amount) in source.stems.iter().zip(&source.amounts) {
                    consumed.record(&source.token, *stem, *amount);
                }
            }
        }
        consumed
    }

    /// Amount of `(token, stem)` already claimed elsewhere
    pub fn claimed(&self, token: &TokenId, stem: Stem) -> u128 {
        self.claimed.get(&(*token, stem)).copied().unwrap_or(0)
    }

    pub fn record(&mut self, token: &TokenId, stem: Stem, amount: u128) {
        let entry = self.claimed.entry((*token, stem)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Merge plans into a single plan, summing per-(token, stem) claims.
///
/// Sources appear in first-appearance order across the inputs; a token's
/// stems keep their first-appearance order with later claims on the same
/// stem folded in. The combined claims are validated against `owner`'s
/// live deposits: a (token, stem) claimed for more than the deposit
/// currently holds is a [`PintoError::LedgerInconsistency`].
pub fn merge_plans<I: DepositInventory>(
    inventory: &I,
    owner: &AccountId,
    plans: &[WithdrawalPlan],
) -> Result<WithdrawalPlan, PintoError> {
    let mut order: Vec<TokenId> = Vec::new();
    let mut stems_by_token: HashMap<TokenId, Vec<Stem>> = HashMap::new();
    let mut claims: HashMap<(TokenId, Stem), u128> = HashMap::new();
    let mut available_by_token: HashMap<TokenId, u128> = HashMap::new();

    for plan in plans {
        plan.validate()?;
        for source in &plan.sources {
            if !stems_by_token.contains_key(&source.token) {
                order.push(source.token);
                stems_by_token.insert(source.token, Vec::new());
            }
            let stems = stems_by_token
                .get_mut(&source.token)
                .ok_or(PintoError::LedgerInconsistency)?;
            for (stem, amount) in source.stems.iter().zip(&source.amounts) {
                let claim = claims.entry((source.token, *stem)).or_insert(0);
                if *claim == 0 && !stems.contains(stem) {
                    stems.push(*stem);
                }
                *claim = claim.checked_add(*amount).ok_or(PintoError::Overflow)?;
            }
            let available = available_by_token.entry(source.token).or_insert(0);
            *available = available
                .checked_add(source.available)
                .ok_or(PintoError::Overflow)?;
        }
    }

    // Combined claims must still fit the deposits actually on the ledger
    for token in &order {
        let deposits = inventory.list_deposits(owner, token);
        for stem in &stems_by_token[token] {
            let claim = claims[&(*token, *stem)];
            let held = deposits
                .iter()
                .find(|d| d.stem == *stem)
                .map(|d| d.amount)
                .unwrap_or(0);
            if claim > held {
                log::debug!(
                    "combiner: claim {} exceeds deposit {} at stem {}",
                    claim,
                    held,
                    stem
                );
                return Err(PintoError::LedgerInconsistency);
            }
        }
    }

    let mut merged = WithdrawalPlan::new();
    for token in order {
        let stems = stems_by_token.remove(&token).unwrap_or_default();
        let amounts = stems.iter().map(|s| claims[&(token, *s)]).collect();
        merged.push_source(PlanSource {
            token,
            stems,
            amounts,
            available: available_by_token.get(&token).copied().unwrap_or(0),
        })?;
    }
    Ok(merged)
}
