//! Collaborator traits - the engine's view of the hosting ledger
//!
//! The engine never owns deposit or pool state. Reads and writes go
//! through these traits so the same planning and execution code runs
//! against any ledger that exposes the primitives below. Within one call
//! the ledger is a consistent snapshot; nothing else mutates deposits
//! mid-call.

use pinto_common::{AccountId, DepositView, PintoError, Stem, TokenId};

/// Reserve snapshot for a Well, with the base token's position marked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellReserves {
    /// Reserve amounts in the Well's token order
    pub amounts: Vec<u128>,
    /// Index of the base asset within `amounts`
    pub base_index: usize,
}

/// Read access to a user's silo deposits and per-token silo state
pub trait DepositInventory {
    /// Whitelisted deposit tokens in whitelist order. Explicit source
    /// lists index into this order.
    fn whitelisted_tokens(&self) -> Vec<TokenId>;

    /// All deposits held by `owner` for `token`
    fn list_deposits(&self, owner: &AccountId, token: &TokenId) -> Vec<DepositView>;

    /// Current age frontier for `token`
    fn stem_tip(&self, token: &TokenId) -> Stem;

    /// Deposits at or above this stem are still germinating
    fn germinating_boundary(&self, token: &TokenId) -> Stem;

    /// Current seed rate for `token` (1e6 scale)
    fn seed_rate(&self, token: &TokenId) -> i64;
}

/// Valuation and price-guard access to Wells
pub trait WellAdapter {
    /// Current reserves of `well`
    fn reserves(&self, well: &TokenId) -> Result<WellReserves, PintoError>;

    /// Pool-share supply implied by a (possibly hypothetical) reserve
    /// snapshot of `well`
    fn share_supply_from_reserves(
        &self,
        well: &TokenId,
        reserves: &[u128],
    ) -> Result<u128, PintoError>;

    /// Base-asset amount paid out for removing `shares` single-sided at
    /// current reserves
    fn quote_remove_liquidity(&self, well: &TokenId, shares: u128) -> Result<u128, PintoError>;

    /// Instantaneous price of `token` denominated in base asset (1e6
    /// scale)
    fn instantaneous_price(&self, token: &TokenId) -> Result<i64, PintoError>;

    /// Whether the Well's spot price sits within `max_deviation_bps` of
    /// its manipulation-resistant reference price
    fn is_slippage_acceptable(&self, well: &TokenId, max_deviation_bps: u64) -> bool;
}

/// Write access used by the plan executor
pub trait SiloVault {
    /// Withdraw the listed stems/amounts of `token` from `owner`'s
    /// deposits, crediting `destination`. Withdrawal is positional: the
    /// ledger consumes stems in the order given.
    fn withdraw_deposits(
        &mut self,
        owner: &AccountId,
        token: &TokenId,
        stems: &[Stem],
        amounts: &[u128],
        destination: &AccountId,
    ) -> Result<(), PintoError>;

    /// Burn `shares` of `well` single-sided for the base asset, crediting
    /// `recipient`. Fails if the realized amount is below `min_base_out`.
    fn remove_liquidity(
        &mut self,
        well: &TokenId,
        shares: u128,
        min_base_out: u128,
        recipient: &AccountId,
    ) -> Result<u128, PintoError>;

    /// Move `amount` of `token` between internal balances
    fn transfer(
        &mut self,
        token: &TokenId,
        amount: u128,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(), PintoError>;
}
