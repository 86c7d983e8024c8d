//! Source ordering strategies
//!
//! Sources are either named explicitly (as whitelist indices) or derived
//! at plan time from mutable protocol state. Derived orderings are never
//! cached: price and seed rate move every season.

use pinto_common::{PintoError, TokenId, SCALE};
use serde::{Deserialize, Serialize};

use crate::filter::FilterParams;
use crate::ledger::{DepositInventory, WellAdapter};

/// How to order candidate withdrawal sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSelectionStrategy {
    /// Explicit whitelist indices, tried in the given order
    Explicit(Vec<u16>),
    /// Cheapest tokens first by instantaneous price
    AscendingPrice,
    /// Lowest seed rate first
    AscendingSeeds,
}

/// Resolve a strategy into a concrete ordered token list.
///
/// Explicit lists are validated against the whitelist; an empty list or
/// an out-of-range index is an `InvalidArgument`, raised before any other
/// ledger read. Derived orderings stable-sort the whitelist ascending by
/// price or seed rate, so ties keep the original whitelist order. The
/// base asset prices at exactly `SCALE` and is removed from any resolved
/// order when the filter excludes it.
pub fn resolve_sources<I, W>(
    inventory: &I,
    wells: &W,
    base_token: &TokenId,
    strategy: &TokenSelectionStrategy,
    filter: &FilterParams,
) -> Result<Vec<TokenId>, PintoError>
where
    I: DepositInventory,
    W: WellAdapter,
{
    let mut tokens = match strategy {
        TokenSelectionStrategy::Explicit(indices) => {
            if indices.is_empty() {
                return Err(PintoError::InvalidArgument("source list must not be empty"));
            }
            let whitelist = inventory.whitelisted_tokens();
            let mut resolved = Vec::with_capacity(indices.len());
            for index in indices {
                let token = whitelist
                    .get(*index as usize)
                    .copied()
                    .ok_or(PintoError::InvalidArgument("source index outside whitelist"))?;
                resolved.push(token);
            }
            resolved
        }
        TokenSelectionStrategy::AscendingPrice => sorted_whitelist(inventory, |token| {
            if token == base_token {
                Ok(SCALE)
            } else {
                wells.instantaneous_price(token)
            }
        })?,
        TokenSelectionStrategy::AscendingSeeds => {
            sorted_whitelist(inventory, |token| Ok(inventory.seed_rate(token)))?
        }
    };

    if filter.exclude_base_asset {
        tokens.retain(|token| token != base_token);
    }
    Ok(tokens)
}

fn sorted_whitelist<I, F>(inventory: &I, mut key: F) -> Result<Vec<TokenId>, PintoError>
where
    I: DepositInventory,
    F: FnMut(&TokenId) -> Result<i64, PintoError>,
{
    let whitelist = inventory.whitelisted_tokens();
    let mut keyed = Vec::with_capacity(whitelist.len());
    for token in whitelist {
        keyed.push((key(&token)?, token));
    }
    // Stable sort: equal keys keep whitelist order
    keyed.sort_by_key(|(k, _)| *k);
    Ok(keyed.into_iter().map(|(_, token)| token).collect())
}
