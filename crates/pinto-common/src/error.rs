//! Error taxonomy for planning and execution

use thiserror::Error;

/// Errors surfaced by the withdrawal engine.
///
/// All errors propagate synchronously to the caller; the engine performs
/// no internal retries and keeps no partial state across a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PintoError {
    /// Caller-fixable input problem (empty source list, zero target,
    /// out-of-range source index, inconsistent filter thresholds)
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Every candidate source yielded zero withdrawable value
    #[error("no liquidity available across withdrawal sources")]
    NoLiquidityAvailable,

    /// Plan covers less than the caller's required amount
    #[error("insufficient funds: plan covers {available} of {required}")]
    InsufficientFunds { required: u128, available: u128 },

    /// Well price moved beyond the caller's slippage bound at execution
    /// time; hard abort, never retried
    #[error("price manipulation detected on well source")]
    PriceManipulationDetected,

    /// A plan references deposits or amounts no longer present on the
    /// ledger, or combined plans over-allocate a deposit
    #[error("ledger inconsistency: plan references unavailable deposits")]
    LedgerInconsistency,

    /// Well reserves cannot satisfy the requested removal
    #[error("insufficient well liquidity")]
    InsufficientLiquidity,

    /// Token is not whitelisted or not known to a collaborator
    #[error("unknown token")]
    UnknownToken,

    /// Arithmetic overflow in fixed-point or reserve math
    #[error("arithmetic overflow")]
    Overflow,
}
