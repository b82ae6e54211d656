//! # moto-financing
//!
//! Financing simulator for a motorcycle dealership's referral system.
//!
//! Given a vehicle price, a down payment, an installment count and a
//! monthly interest rate, computes the fixed installment under compound
//! interest together with total paid and total interest.
//!
//! ## Architecture
//!
//! - **core** — Money parsing and formatting, identifiers, validated inputs
//! - **config** — Input policy (lenient defaults or strict rejection)
//! - **financing** — Quote computation and amortization schedules
//! - **simulation** — Term comparison grids and saved simulation records

pub mod config;
pub mod core;
pub mod financing;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{CoercionMode, InputPolicy, SimulatorConfig};
    pub use crate::core::ids::{LeadId, Role, UserId};
    pub use crate::core::input::{InputError, QuoteForm, QuoteInput};
    pub use crate::financing::quote::{FinancingQuote, FinancingSimulator, QuoteError};
    pub use crate::financing::schedule::{AmortizationSchedule, ScheduleError};
    pub use crate::simulation::comparison::{compare_terms, ComparisonConfig, TermComparison};
    pub use crate::simulation::record::SimulationRecord;
}
