//! Withdrawal plan engine for the Pinto silo
//!
//! Given a user's deposits spread across the base asset and Well LP
//! tokens, the engine selects which deposits to withdraw, in what order,
//! and how much of each to satisfy a target amount of base-asset value.
//! Planning is a pure computation over ledger reads; execution mutates the
//! ledger through the write traits and converts LP deposits to the base
//! asset under slippage bounds.

pub mod executor;
pub mod filter;
pub mod ledger;
pub mod plan;
pub mod planner;
pub mod selector;
pub mod strategy;


pub use executor::*;
pub use filter::*;
pub use ledger::*;
pub use plan::*;
pub use planner::*;
pub use selector::*;
pub use strategy::*;
