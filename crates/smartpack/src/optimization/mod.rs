//! Deterministic packaging recommendations.
//!
//! [`calculate`] is the fallback used whenever the AI advisor is not asked
//! for a recommendation. It is a pure function of its input.

mod calculator;
mod materials;
mod record;

pub use calculator::{calculate, Dimensions, OptimizationResult, PackagingInput};
pub use materials::MaterialClass;
pub use record::{NewOptimization, OptimizationRecord, OptimizationStatus};
