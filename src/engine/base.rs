//! Base builder: admits trade-in credit, rebate split, fee/product
//! taxability into `vehicleBase`/`feesBase`/`productsBase` per §4.3.

use crate::types::{
    DealInput, DealType, DebugTrace, FeeTrace, Money, RebateBehavior, RebateSource, StateRule,
    TaxBases, TradeInCredit,
};

/// Result of the base builder: the three bases plus whatever the
/// reciprocity/rate stages need (state-only trade-in credit) and the debug
/// trace entries this stage is responsible for.
pub struct BaseResult {
    pub bases: TaxBases,
    /// Trade-in credit admitted only against state-rate components (Alabama-style).
    pub applied_trade_in_state_only: Money,
    pub debug: DebugTrace,
}

pub fn build_base(rule: &StateRule, input: &DealInput) -> BaseResult {
    match input.deal_type {
        DealType::Retail => build_retail_base(rule, input),
        DealType::Lease => build_lease_base(rule, input),
    }
}

fn build_retail_base(rule: &StateRule, input: &DealInput) -> BaseResult {
    let mut debug = DebugTrace::default();

    let admitted_trade_in = rule
        .trade_in_policy
        .admitted_credit(input.trade_in_value.as_decimal());
    let mut applied_trade_in = Money::new(admitted_trade_in);
    let mut applied_trade_in_state_only = Money::ZERO;
    if rule.extras.trade_in_state_only {
        applied_trade_in_state_only = applied_trade_in;
        applied_trade_in = Money::ZERO;
    }
    debug.applied_trade_in = applied_trade_in.max(applied_trade_in_state_only);

    let mut vehicle_price = input.vehicle_price;
    let mut non_taxable_rebates = Money::ZERO;
    let mut taxable_rebates = Money::ZERO;

    for (source, amount) in [
        (RebateSource::Manufacturer, input.rebate_manufacturer),
        (RebateSource::Dealer, input.rebate_dealer),
    ] {
        if let Some(rebate_rule) = rule.rebates.get(&source) {
            if rebate_rule.taxable {
                taxable_rebates = taxable_rebates + amount;
            } else {
                non_taxable_rebates = non_taxable_rebates + amount;
                vehicle_price = (vehicle_price - amount).clamp_zero();
            }
        }
    }
    debug.applied_rebates_non_taxable = non_taxable_rebates;
    debug.applied_rebates_taxable = taxable_rebates;

    let mut vehicle_base = (vehicle_price - applied_trade_in).clamp_zero();
    if rule.tax_on_accessories {
        vehicle_base = vehicle_base + input.accessories_amount;
    }
    if rule.tax_on_negative_equity {
        vehicle_base = vehicle_base + input.negative_equity;
    }

    let (fees_base, taxable_doc_fee, fee_trace) = build_fees_base(rule, input, DealType::Retail);
    debug.taxable_doc_fee = taxable_doc_fee;
    debug.taxable_fees = fee_trace;

    let mut products_base = Money::ZERO;
    if rule.tax_on_service_contracts {
        products_base = products_base + input.service_contracts;
        debug.taxable_service_contracts = input.service_contracts;
    }
    if rule.tax_on_gap {
        products_base = products_base + input.gap;
        debug.taxable_gap = input.gap;
    }

    let bases = TaxBases {
        vehicle_base,
        fees_base,
        products_base,
        total_taxable_base: vehicle_base + fees_base + products_base,
    };

    BaseResult { bases, applied_trade_in_state_only, debug }
}

fn build_lease_base(rule: &StateRule, input: &DealInput) -> BaseResult {
    let mut debug = DebugTrace::default();
    let lease = &rule.lease_rules;

    let trade_in_credit = match lease.trade_in_credit {
        TradeInCredit::FollowRetailRule => {
            rule.trade_in_policy.admitted_credit(input.cap_reduction_trade_in.as_decimal())
        }
        TradeInCredit::Full => input.cap_reduction_trade_in.as_decimal(),
        TradeInCredit::None | TradeInCredit::CapCostOnly => Default::default(),
    };
    let applied_trade_in = Money::new(trade_in_credit);
    debug.applied_trade_in = applied_trade_in;

    let rebate_taxable = |source_taxable: bool| -> bool {
        match lease.rebate_behavior {
            RebateBehavior::AlwaysTaxable => true,
            RebateBehavior::AlwaysNonTaxable => false,
            RebateBehavior::FollowRetailRule => source_taxable,
        }
    };

    let mfr_taxable_in_rule =
        rule.rebates.get(&RebateSource::Manufacturer).map(|r| r.taxable).unwrap_or(true);
    let dealer_taxable_in_rule =
        rule.rebates.get(&RebateSource::Dealer).map(|r| r.taxable).unwrap_or(true);

    let mut non_taxable_rebates = Money::ZERO;
    let mut taxable_rebates = Money::ZERO;
    let mut cap_cost = input.gross_cap_cost;

    if rebate_taxable(mfr_taxable_in_rule) {
        taxable_rebates = taxable_rebates + input.cap_reduction_rebate_manufacturer;
    } else {
        non_taxable_rebates = non_taxable_rebates + input.cap_reduction_rebate_manufacturer;
        cap_cost = (cap_cost - input.cap_reduction_rebate_manufacturer).clamp_zero();
    }
    if rebate_taxable(dealer_taxable_in_rule) {
        taxable_rebates = taxable_rebates + input.cap_reduction_rebate_dealer;
    } else {
        non_taxable_rebates = non_taxable_rebates + input.cap_reduction_rebate_dealer;
        cap_cost = (cap_cost - input.cap_reduction_rebate_dealer).clamp_zero();
    }
    debug.applied_rebates_non_taxable = non_taxable_rebates;
    debug.applied_rebates_taxable = taxable_rebates;

    let mut vehicle_base = (cap_cost - applied_trade_in).clamp_zero();
    if lease.negative_equity_taxable {
        vehicle_base = vehicle_base + input.negative_equity;
    }

    let (fees_base, taxable_doc_fee, fee_trace) = build_fees_base(rule, input, DealType::Lease);
    debug.taxable_doc_fee = taxable_doc_fee;
    debug.taxable_fees = fee_trace;

    let mut products_base = Money::ZERO;
    if rule.product_taxability(DealType::Lease, "SERVICE_CONTRACT") || rule.tax_on_service_contracts {
        products_base = products_base + input.service_contracts;
        debug.taxable_service_contracts = input.service_contracts;
    }
    if rule.product_taxability(DealType::Lease, "GAP") || rule.tax_on_gap {
        products_base = products_base + input.gap;
        debug.taxable_gap = input.gap;
    }

    let bases = TaxBases {
        vehicle_base,
        fees_base,
        products_base,
        total_taxable_base: vehicle_base + fees_base + products_base,
    };

    BaseResult { bases, applied_trade_in_state_only: Money::ZERO, debug }
}

fn build_fees_base(
    rule: &StateRule,
    input: &DealInput,
    mode: DealType,
) -> (Money, Money, Vec<FeeTrace>) {
    let doc_fee_taxable = match mode {
        DealType::Retail => rule.doc_fee_taxable,
        DealType::Lease => match rule.lease_rules.doc_fee_taxability {
            crate::types::DocFeeTaxability::Always => true,
            crate::types::DocFeeTaxability::Never => false,
            crate::types::DocFeeTaxability::FollowRetailRule => rule.doc_fee_taxable,
        },
    };

    let taxable_doc_fee = if doc_fee_taxable { input.doc_fee } else { Money::ZERO };
    let mut fees_base = taxable_doc_fee;
    let mut trace = Vec::new();

    for fee in &input.other_fees {
        let taxable = rule.product_taxability(mode, &fee.code);
        if taxable {
            fees_base = fees_base + fee.amount;
        }
        trace.push(FeeTrace { code: fee.code.clone(), amount: if taxable { fee.amount } else { Money::ZERO } });
    }

    (fees_base, taxable_doc_fee, trace)
}
