//! Core identifiers and numeric conventions

use serde::{Deserialize, Serialize};

/// Fixed-point scaling factor for prices and rates (1e6)
pub const SCALE: i64 = 1_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Per-token deposit age marker.
///
/// Stems increase monotonically per token; a higher stem means a more
/// recent deposit with less grown stalk accrued. Stems are expressed in
/// grown-stalk-per-BDV units, so stem differences are directly comparable
/// to grown-stalk thresholds.
pub type Stem = i64;

/// Opaque 32-byte token identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 32]> for TokenId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for TokenId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TokenId({:02x}{:02x}..{:02x})", self.0[0], self.0[1], self.0[31])
    }
}

/// Opaque 32-byte account identifier
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AccountId({:02x}{:02x}..{:02x})", self.0[0], self.0[1], self.0[31])
    }
}

/// A single deposit as read from the ledger: (stem, amount)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositView {
    /// Deposit age marker
    pub stem: Stem,
    /// Remaining deposited amount (token native units)
    pub amount: u128,
}
