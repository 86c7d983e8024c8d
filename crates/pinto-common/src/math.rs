//! Constant product Well math (x·y=k)
//!
//! Two-token Wells use the LP-supply convention `supply = 2·isqrt(x·y)`,
//! so `(supply/2)² = x·y` holds as the pool invariant.

use crate::error::PintoError;
use crate::types::SCALE;

/// Calculate pool-share supply implied by a reserve snapshot
///
/// # Arguments
/// * `reserves` - Two-token reserve amounts, both non-zero
///
/// # Returns
/// * Implied LP supply `2·isqrt(x·y)`
pub fn cp2_share_supply(reserves: &[u128]) -> Result<u128, PintoError> {
    let [x, y] = two_reserves(reserves)?;

    let k = x.checked_mul(y).ok_or(PintoError::Overflow)?;
    Ok(2 * k.isqrt())
}

/// Quote single-sided removal of the base token
///
/// Burning `shares` from `supply` moves the invariant to
/// `(supply − shares)²/4 = x'·y`, so with the paired reserve `y` held
/// constant the new base reserve is `x' = (supply − shares)² / (4·y)` and
/// the payout is `x − x'`. `x'` rounds up, so the payout rounds in the
/// pool's favor.
///
/// # Arguments
/// * `reserves` - Current reserve amounts
/// * `base_index` - Which reserve is the base token (0 or 1)
/// * `supply` - Current pool-share supply
/// * `shares` - Pool-share amount to burn
///
/// # Returns
/// * Base-token amount paid out for `shares`
pub fn cp2_remove_base_out(
    reserves: &[u128],
    base_index: usize,
    supply: u128,
    shares: u128,
) -> Result<u128, PintoError> {
    let [r0, r1] = two_reserves(reserves)?;
    if base_index > 1 {
        return Err(PintoError::InvalidArgument("base reserve index out of range"));
    }
    let (x, y) = if base_index == 0 { (r0, r1) } else { (r1, r0) };

    if supply == 0 || shares == 0 {
        return Err(PintoError::InvalidArgument("zero supply or zero shares"));
    }
    if shares > supply {
        return Err(PintoError::InsufficientLiquidity);
    }

    let remaining = supply - shares;
    let numer = remaining
        .checked_mul(remaining)
        .ok_or(PintoError::Overflow)?;
    let denom = y.checked_mul(4).ok_or(PintoError::Overflow)?;

    // Ceil division: keep the rounding dust in the pool
    let x_after = numer.div_ceil(denom);
    let out = x.checked_sub(x_after).ok_or(PintoError::LedgerInconsistency)?;

    Ok(out)
}

/// Spot price of the paired token denominated in base, scaled by `SCALE`
pub fn cp2_spot_price(reserves: &[u128], base_index: usize) -> Result<i64, PintoError> {
    let [r0, r1] = two_reserves(reserves)?;
    if base_index > 1 {
        return Err(PintoError::InvalidArgument("base reserve index out of range"));
    }
    let (base, paired) = if base_index == 0 { (r0, r1) } else { (r1, r0) };

    let scaled = base
        .checked_mul(SCALE as u128)
        .ok_or(PintoError::Overflow)?;
    let px = scaled / paired;
    if px > i64::MAX as u128 {
        return Err(PintoError::Overflow);
    }
    Ok(px as i64)
}

/// Check that a spot price sits within `tolerance_bps` of a
/// manipulation-resistant reference price
///
/// # Arguments
/// * `spot` - Current spot price (1e6 scale)
/// * `reference` - Reference price, e.g. from a capped-reserve oracle (1e6 scale)
/// * `tolerance_bps` - Allowed deviation in basis points (e.g. 50 = 0.5%)
///
/// # Returns
/// * `true` if within tolerance, `false` if deviated (or reference is zero)
pub fn price_within_deviation(spot: i64, reference: i64, tolerance_bps: u64) -> bool {
    if reference == 0 {
        return false;
    }

    let diff = (spot as i128 - reference as i128).unsigned_abs();
    let threshold = (reference.unsigned_abs() as u128 * tolerance_bps as u128) / 10_000;

    diff <= threshold
}

fn two_reserves(reserves: &[u128]) -> Result<[u128; 2], PintoError> {
    match reserves {
        [x, y] if *x > 0 && *y > 0 => Ok([*x, *y]),
        [_, _] => Err(PintoError::InsufficientLiquidity),
        _ => Err(PintoError::InvalidArgument("wells must carry two reserves")),
    }
}
