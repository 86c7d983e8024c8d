//! Deposit eligibility and priority rules

use pinto_common::{PintoError, Stem};
use serde::{Deserialize, Serialize};

/// How to treat deposits in the low-priority band (very little grown
/// stalk, below seed parity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LowPriorityMode {
    /// Consume low-priority deposits in scan order
    Use,
    /// Never consume low-priority deposits
    Skip,
    /// Defer low-priority deposits to a second pass after all others
    UseLast,
}

/// Eligibility and priority rules for deposit selection.
///
/// Thresholds are expressed in grown-stalk-per-BDV units and resolved to
/// per-token stem bounds lazily at selection time, since every token has
/// its own stem tip:
///
/// * `min_stem = stem_tip − max_grown_stalk_per_bdv`: deposits below
///   this have accrued too much grown stalk to spend cheaply and are
///   excluded.
/// * `max_stem = stem_tip − low_priority_grown_stalk_per_bdv`: deposits
///   above this form the low-priority band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Upper bound on grown stalk a selected deposit may have forfeited
    pub max_grown_stalk_per_bdv: i64,
    /// Grown-stalk threshold under which a deposit is low-priority
    pub low_priority_grown_stalk_per_bdv: i64,
    /// Exclude deposits still inside their germination period
    pub exclude_germinating: bool,
    /// Exclude the base asset from source resolution
    pub exclude_base_asset: bool,
    /// Treatment of the low-priority band
    pub low_priority_mode: LowPriorityMode,
}

/// Per-token stem bounds resolved from a [`FilterParams`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemBounds {
    pub min_stem: Stem,
    pub max_stem: Stem,
}

impl FilterParams {
    /// Default policy: cap grown-stalk forfeiture, no germination
    /// exclusion, base asset included, no low-priority band.
    pub fn with_max_grown_stalk(max_grown_stalk_per_bdv: i64) -> Self {
        Self {
            max_grown_stalk_per_bdv,
            low_priority_grown_stalk_per_bdv: 0,
            exclude_germinating: false,
            exclude_base_asset: false,
            low_priority_mode: LowPriorityMode::Use,
        }
    }

    /// Accept any deposit regardless of age
    pub fn unbounded() -> Self {
        Self::with_max_grown_stalk(i64::MAX)
    }

    pub fn validate(&self) -> Result<(), PintoError> {
        if self.low_priority_grown_stalk_per_bdv > self.max_grown_stalk_per_bdv {
            return Err(PintoError::InvalidArgument(
                "low-priority threshold exceeds max grown stalk",
            ));
        }
        Ok(())
    }

    /// Resolve stem bounds for a token given its current stem tip
    pub fn stem_bounds(&self, stem_tip: Stem) -> StemBounds {
        StemBounds {
            min_stem: stem_tip.saturating_sub(self.max_grown_stalk_per_bdv),
            max_stem: stem_tip.saturating_sub(self.low_priority_grown_stalk_per_bdv),
        }
    }
}
