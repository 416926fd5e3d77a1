//! The declarative per-state rule model.
//!
//! A [`StateRule`] is data, not code: every variation observed across the
//! fifty states (luxury tiers, trade-in caps, lease timing methods, special
//! schemes) is expressed as a typed field here rather than as a branch in
//! the engine. The engine reads only the sub-structs it declares; anything
//! else belongs in `extras.notes` for diagnostics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::money::Rate;

/// How a state admits trade-in value as a credit against the taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum TradeInPolicy {
    /// Full trade-in value is credited.
    Full,
    /// Credit is capped at a fixed dollar amount.
    Capped(Decimal),
    /// Credit is a fraction of the trade-in value.
    Percent(Decimal),
    /// No trade-in credit is admitted (post-HB754-style states).
    None,
}

impl TradeInPolicy {
    /// Admitted credit given the raw trade-in value.
    pub fn admitted_credit(&self, trade_in_value: Decimal) -> Decimal {
        match self {
            TradeInPolicy::Full => trade_in_value,
            TradeInPolicy::Capped(cap) => trade_in_value.min(*cap),
            TradeInPolicy::Percent(fraction) => trade_in_value * fraction,
            TradeInPolicy::None => Decimal::ZERO,
        }
    }
}

/// Rebate source, used both for the retail rebate table and lease cap-cost reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebateSource {
    Manufacturer,
    Dealer,
}

/// Whether a rebate from a given source reduces the taxable base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RebateRule {
    /// `true` means the rebate does NOT reduce the base (customer is taxed pre-rebate).
    pub taxable: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Known fee codes the engine has explicit taxability rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeCode {
    DocFee,
    Title,
    Reg,
    ServiceContract,
    Gap,
    AcquisitionFee,
    DispositionFee,
    ExciseTax,
    ExcessMileage,
    ExtendedWarranty,
    Accessories,
    /// Any fee code the rule doesn't explicitly model; treated as non-taxable.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTaxRule {
    pub taxable: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// How the vehicle's sales/use tax is composed across state and local jurisdictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTaxScheme {
    StateOnly,
    StatePlusLocal,
    LocalOnly,
    SpecialTavt,
    SpecialHut,
    DmvPrivilegeTax,
}

/// How a lease partitions its taxable base between signing and the payment stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseMethod {
    Monthly,
    FullUpfront,
    Hybrid,
}

/// How a lease treats trade-in value distinctly from the retail policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeInCredit {
    Full,
    None,
    CapCostOnly,
    FollowRetailRule,
}

/// How a lease treats rebates distinctly from the retail policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebateBehavior {
    AlwaysTaxable,
    AlwaysNonTaxable,
    FollowRetailRule,
}

/// How a lease treats the doc fee distinctly from the retail policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocFeeTaxability {
    Always,
    Never,
    FollowRetailRule,
}

/// Per-title-fee-code cash-flow routing, independent of taxability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleFeeFlow {
    pub taxable: bool,
    pub included_in_cap_cost: bool,
    pub included_in_upfront: bool,
    pub included_in_monthly: bool,
}

/// Lease-specific rule overrides. Distinct from the retail rules above because
/// many states tax leases on a different basis than a cash or financed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseRules {
    pub method: LeaseMethod,
    #[serde(default)]
    pub tax_cap_reduction: bool,
    pub rebate_behavior: RebateBehavior,
    pub doc_fee_taxability: DocFeeTaxability,
    pub trade_in_credit: TradeInCredit,
    #[serde(default)]
    pub negative_equity_taxable: bool,
    #[serde(default)]
    pub fee_tax_rules: HashMap<String, FeeTaxRule>,
    #[serde(default)]
    pub title_fee_rules: HashMap<String, TitleFeeFlow>,
    #[serde(default)]
    pub tax_fees_upfront: bool,
    #[serde(default)]
    pub special_scheme: Option<SpecialSchemeConfig>,
    /// Additional flat-rate surcharge components injected only in lease mode
    /// (PA's 3% motor-vehicle lease tax, NY's 0.375% MCTD surcharge).
    #[serde(default)]
    pub lease_surcharges: Vec<LeaseSurcharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseSurcharge {
    pub label: String,
    pub rate: Rate,
}

/// Typed special-scheme sub-configs. Replaces the source's opaque per-state
/// "extras" bag with an explicit sum type; the engine matches on this rather
/// than string-keyed lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scheme")]
pub enum SpecialSchemeConfig {
    /// Georgia-style Title Ad Valorem Tax: single rate, replaces sales tax entirely.
    Tavt {
        rate: Rate,
        allow_trade_in_credit: bool,
    },
    /// North Carolina-style Highway Use Tax: flat rate, capped base, local-tax-free.
    Hut {
        rate: Rate,
        cap: Option<Decimal>,
        apply_to_net_price_only: bool,
        max_reciprocity_age_days: Option<i64>,
    },
    /// West Virginia-style DMV privilege tax: flat rate collected at registration.
    Privilege { rate: Rate },
    /// Iowa-style one-time lease/vehicle registration fee computed off net price.
    IowaFee { base_rate: Rate, flat_component: Decimal },
    /// Maryland-style "upfront gain" lease aggregate adjustment.
    MdUpfrontGain,
    None,
}

/// Advisory, typed sub-fields the engine actually reads, plus a free-form
/// notes map for anything purely diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleExtras {
    /// Pre-trade-in sale price + doc fee threshold at/above which the luxury rate applies.
    #[serde(default)]
    pub luxury_threshold: Option<Decimal>,
    /// Replacement state rate once the luxury threshold is met.
    #[serde(default)]
    pub luxury_rate: Option<Rate>,
    /// Flat rate applied to extended-warranty/VSC sub-base regardless of luxury status.
    #[serde(default)]
    pub warranty_rate: Option<Rate>,
    /// Cap on a taxable doc fee, if the state limits it.
    #[serde(default)]
    pub doc_fee_cap: Option<Decimal>,
    /// When `VehicleTaxScheme::StatePlusLocal` restricts trade-in credit to the
    /// state-rate component only (Alabama-style).
    #[serde(default)]
    pub trade_in_state_only: bool,
    /// Free-form advisory notes; never read by the engine.
    #[serde(default)]
    pub notes: HashMap<String, String>,
    /// Registry load/lookup status.
    pub status: RuleStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    #[default]
    Active,
    Stub,
}

/// Reciprocity credit basis: whether the credit is computed from the tax
/// actually paid at origin, or from what would be due there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReciprocityBasis {
    TaxPaid,
    TaxDue,
}

/// Which deal modes reciprocity applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReciprocityScope {
    Retail,
    Lease,
    Both,
}

/// How a home-state (buyer residence) credit is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeStateBehavior {
    None,
    CreditUpToStateRate,
    CreditFull,
    /// Full exemption when the buyer's home state matches an override's origin (WA/OR).
    HomeStateOnly,
}

/// Per-origin-state exception to the default reciprocity rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocityOverride {
    pub origin_state: String,
    #[serde(default)]
    pub disallow_credit: bool,
    #[serde(default)]
    pub mode_override: Option<ReciprocityScope>,
    #[serde(default)]
    pub scope_override: Option<ReciprocityScope>,
    #[serde(default)]
    pub max_age_days_since_tax_paid: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocityRules {
    pub enabled: bool,
    pub scope: ReciprocityScope,
    pub home_state_behavior: HomeStateBehavior,
    #[serde(default)]
    pub require_proof_of_tax_paid: bool,
    pub basis: ReciprocityBasis,
    #[serde(default)]
    pub cap_at_this_states_tax: bool,
    #[serde(default)]
    pub has_lease_exception: bool,
    #[serde(default)]
    pub overrides: Vec<ReciprocityOverride>,
}

impl ReciprocityRules {
    pub fn override_for(&self, origin_state: &str) -> Option<&ReciprocityOverride> {
        self.overrides
            .iter()
            .find(|o| o.origin_state.eq_ignore_ascii_case(origin_state))
    }
}

/// A single state's tax rule: everything the engine needs to calculate tax
/// for a deal in that state, with no per-state code paths in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRule {
    pub state_code: String,
    pub version: u32,
    pub trade_in_policy: TradeInPolicy,
    pub rebates: HashMap<RebateSource, RebateRule>,
    pub doc_fee_taxable: bool,
    #[serde(default)]
    pub fee_tax_rules: HashMap<String, FeeTaxRule>,
    #[serde(default)]
    pub tax_on_accessories: bool,
    #[serde(default)]
    pub tax_on_negative_equity: bool,
    #[serde(default)]
    pub tax_on_service_contracts: bool,
    #[serde(default)]
    pub tax_on_gap: bool,
    pub vehicle_tax_scheme: VehicleTaxScheme,
    #[serde(default = "default_true")]
    pub vehicle_uses_local_sales_tax: bool,
    pub lease_rules: LeaseRules,
    pub reciprocity: ReciprocityRules,
    #[serde(default)]
    pub special_scheme: Option<SpecialSchemeConfig>,
    #[serde(default)]
    pub extras: RuleExtras,
}

fn default_true() -> bool {
    true
}

impl StateRule {
    /// Unifies the several mode/code-dispatched taxability lookups the source
    /// duplicated between retail and lease fee tables into one function.
    pub fn product_taxability(&self, mode: super::DealType, code: &str) -> bool {
        let table = match mode {
            super::DealType::Retail => &self.fee_tax_rules,
            super::DealType::Lease => &self.lease_rules.fee_tax_rules,
        };
        table.get(code).map(|r| r.taxable).unwrap_or(false)
    }

    pub fn is_stub(&self) -> bool {
        self.extras.status == RuleStatus::Stub
    }

    /// Structural validation run once at registry construction. A rule that
    /// fails this check cannot be loaded; the registry refuses to construct.
    pub fn validate(&self) -> Result<(), String> {
        if self.state_code.len() != 2 || !self.state_code.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(format!("state_code `{}` must be two letters", self.state_code));
        }
        if self.rebates.is_empty() {
            return Err("rebates table must not be empty".to_string());
        }
        match &self.reciprocity.home_state_behavior {
            HomeStateBehavior::None
            | HomeStateBehavior::CreditUpToStateRate
            | HomeStateBehavior::CreditFull
            | HomeStateBehavior::HomeStateOnly => {}
        }
        Ok(())
    }
}
