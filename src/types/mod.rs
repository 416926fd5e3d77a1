//! Type definitions for the motor-vehicle tax engine.
//!
//! # Module organization
//!
//! - `money` - fixed-point financial primitives (`Money`, `Rate`, `MoneyFactor`)
//! - `rule` - the declarative per-state `StateRule` model
//! - `deal` - the calculator's input (`DealInput`) and its nested types
//! - `context` - state-resolution types (`TaxContext`, `RooftopConfig`, `DealParties`)
//! - `result` - the calculator's output (`TaxCalculationResult`) and its nested types

pub mod context;
pub mod deal;
pub mod money;
pub mod result;
pub mod rule;

pub use context::{DealParties, RooftopConfig, StateOverride, TaxContext, TaxPerspective};
pub use deal::{DealInput, DealType, OriginTaxInfo, OtherFee, RateInput};
pub use money::{Money, MoneyFactor, Rate};
pub use result::{ComponentTax, DebugTrace, LeaseBreakdown, TaxBases, TaxCalculationResult};
pub use rule::{
    DocFeeTaxability, FeeCode, FeeTaxRule, HomeStateBehavior, LeaseMethod, LeaseRules,
    LeaseSurcharge, RebateBehavior, RebateRule, RebateSource, ReciprocityBasis,
    ReciprocityOverride, ReciprocityRules, ReciprocityScope, RuleExtras, RuleStatus,
    SpecialSchemeConfig, StateRule, TitleFeeFlow, TradeInCredit, TradeInPolicy,
    VehicleTaxScheme,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Two-letter US state codes covered by the rule registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateCode {
    AL, AK, AZ, AR, CA, CO, CT, DE, FL,
    GA, HI, ID, IL, IN, IA, KS, KY, LA, ME,
    MD, MA, MI, MN, MS, MO, MT, NE, NV, NH,
    NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI,
    SC, SD, TN, TX, UT, VT, VA, WA, WV, WI,
    WY,
}

impl StateCode {
    /// Parse a state code case-insensitively; returns `None` for anything else.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// All 50 canonical codes, in declaration order.
    pub fn all() -> [StateCode; 50] {
        use StateCode::*;
        [
            AL, AK, AZ, AR, CA, CO, CT, DE, FL, GA, HI, ID, IL, IN, IA, KS, KY, LA, ME, MD, MA,
            MI, MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI, SC, SD, TN,
            TX, UT, VT, VA, WA, WV, WI, WY,
        ]
    }
}

/// Deal mode the engine is computing for; mirrors `DealType` but named for
/// contexts (rule lookups, reciprocity scope) that speak in terms of "mode".
pub type Mode = DealType;

/// Decimal extension trait for financial calculations (banker's rounding helpers).
pub trait DecimalExt {
    /// Round to 2 decimal places using banker's rounding (round-half-to-even).
    fn round_money(self) -> Decimal;
    /// Round to an arbitrary number of decimal places using banker's rounding.
    fn round_dp_banker(self, dp: u32) -> Decimal;
    /// Ceiling to the given number of decimal places.
    fn ceil_dp(self, dp: u32) -> Decimal;
    /// Floor to the given number of decimal places.
    fn floor_dp(self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn round_money(self) -> Decimal {
        self.round_dp(2)
    }

    fn round_dp_banker(self, dp: u32) -> Decimal {
        self.round_dp(dp)
    }

    fn ceil_dp(self, dp: u32) -> Decimal {
        let scale = Decimal::new(10_i64.pow(dp), 0);
        (self * scale).ceil() / scale
    }

    fn floor_dp(self, dp: u32) -> Decimal {
        let scale = Decimal::new(10_i64.pow(dp), 0);
        (self * scale).floor() / scale
    }
}
