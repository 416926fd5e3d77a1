//! # Motor Vehicle Tax Engine
//!
//! A pure Rust calculation engine for motor-vehicle transaction tax,
//! covering retail purchases and leases across the 50 states.
//!
//! ## Architecture
//!
//! The engine runs a single-pass pipeline per deal:
//!
//! ```text
//! DealInput -> normalize
//!           -> build taxable base (vehicle/fees/products)
//!           -> compose rate components (state/local/luxury/lease surcharge)
//!           -> apply rates (or special-scheme override)
//!           -> resolve reciprocity credit
//!           -> TaxCalculationResult
//! ```
//!
//! Rule lookup and multi-rooftop jurisdiction resolution sit ahead of the
//! pipeline: [`registry::RuleRegistry`] supplies the [`types::StateRule`] for
//! a state, and [`resolver::resolve_tax_context`] decides which state's rule
//! governs a multi-state deal before the engine ever runs.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use motor_tax_engine::prelude::*;
//!
//! let registry = RuleRegistry::new()?;
//! let rule = registry.get_rules_for_state("CT").unwrap();
//! let result = calculate_tax(&input, rule)?;
//! println!("tax due: {}", result.taxes.total_tax);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod types;

pub use engine::{calculate_tax, calculate_tax_json, calculate_tax_with_config, EngineConfig};
pub use error::{TaxError, TaxResult};
pub use registry::RuleRegistry;
pub use resolver::resolve_tax_context;
pub use types::{
    ComponentTax, DealInput, DealParties, DealType, DebugTrace, LeaseBreakdown, Money,
    MoneyFactor, OriginTaxInfo, OtherFee, Rate, RateInput, RooftopConfig, StateCode, StateRule,
    TaxBases, TaxCalculationResult, TaxContext, TaxPerspective, TaxTotals,
};

/// Commonly used types and traits, for `use motor_tax_engine::prelude::*;`.
pub mod prelude {
    pub use crate::engine::{calculate_tax, calculate_tax_with_config, EngineConfig};
    pub use crate::error::{TaxError, TaxResult};
    pub use crate::registry::RuleRegistry;
    pub use crate::resolver::resolve_tax_context;
    pub use crate::types::{
        DealInput, DealParties, DealType, Money, Rate, RooftopConfig, StateCode, StateRule,
        TaxCalculationResult, TaxContext,
    };

    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_library_exports() {
        let _deal_type = DealType::Retail;
        let _money = Money::new(dec!(100));
        let _rate = Rate::from_percentage(dec!(6.25));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _deal_type = DealType::Lease;
        let _money = Money::new(dec!(100));
    }

    #[test]
    fn registry_loads_under_public_api() {
        let registry = RuleRegistry::new().expect("builtin rules must validate");
        assert!(registry.is_state_implemented("CT"));
    }
}
