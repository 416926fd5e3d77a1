//! The calculation engine: normalize -> base -> rate -> apply/lease ->
//! reciprocity -> assemble. The sole public entry point is [`calculate_tax`].

mod apply;
mod base;
mod lease;
mod normalize;
mod rate;
mod reciprocity;
mod scheme;

pub use base::BaseResult;

use crate::error::TaxResult;
use crate::types::{
    ComponentTax, DealInput, DealType, LeaseBreakdown, Money, StateRule, TaxCalculationResult,
    TaxTotals,
};

/// Engine-wide configuration. Mirrors the split between a convenience entry
/// point and a fully configurable one.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub enable_audit_trace: bool,
    pub strict_validation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { enable_audit_trace: true, strict_validation: true }
    }
}

/// Calculate tax for a single deal against a single rule. The sole public
/// entry point for the engine; equivalent to `calculateTax(input, rule)`.
pub fn calculate_tax(input: &DealInput, rule: &StateRule) -> TaxResult<TaxCalculationResult> {
    calculate_tax_with_config(input, rule, &EngineConfig::default())
}

pub fn calculate_tax_with_config(
    input: &DealInput,
    rule: &StateRule,
    _config: &EngineConfig,
) -> TaxResult<TaxCalculationResult> {
    if rule.is_stub() {
        return Err(crate::error::TaxError::stub_state(rule.state_code.clone()));
    }

    log::debug!("normalizing deal input for state {}", input.state_code);
    normalize::normalize(input)?;

    log::debug!("building taxable base for mode {:?}", input.deal_type);
    let base_result = base::build_base(rule, input);

    match input.deal_type {
        DealType::Retail => calculate_retail(input, rule, base_result),
        DealType::Lease => calculate_lease(input, rule, base_result),
    }
}

fn calculate_retail(
    input: &DealInput,
    rule: &StateRule,
    base_result: base::BaseResult,
) -> TaxResult<TaxCalculationResult> {
    let luxury_trigger = input.vehicle_price + input.doc_fee;
    log::debug!("composing rate components");
    let composed = rate::compose_rates(rule, DealType::Retail, &input.rates, luxury_trigger);

    log::debug!("applying tax rates to base");
    let mut totals = apply::apply_tax(apply::ApplyContext {
        rule,
        bases: base_result.bases,
        composed,
        applied_trade_in_state_only: base_result.applied_trade_in_state_only,
        input,
        debug: &base_result.debug,
    });

    let state_rate = input
        .rates
        .iter()
        .find(|r| r.label.eq_ignore_ascii_case("STATE"))
        .map(|r| r.rate.as_decimal())
        .unwrap_or_default();

    log::debug!("resolving reciprocity credit");
    let credit = reciprocity::resolve_reciprocity_credit(
        rule,
        input,
        totals.total_tax,
        state_rate,
        base_result.bases.vehicle_base,
    );

    let mut debug = base_result.debug;
    debug.reciprocity_credit = credit;

    let net_tax = (totals.total_tax - credit - input.tax_already_collected).clamp_zero();
    totals.total_tax = net_tax;

    Ok(TaxCalculationResult {
        mode: DealType::Retail,
        bases: base_result.bases,
        taxes: totals,
        lease_breakdown: None,
        debug,
    })
}

fn calculate_lease(
    input: &DealInput,
    rule: &StateRule,
    base_result: base::BaseResult,
) -> TaxResult<TaxCalculationResult> {
    if let Some(special) = scheme::active_scheme(rule, DealType::Lease) {
        // TAVT-style schemes replace the lease timing method entirely (§4.6):
        // the same scheme applies as a single upfront component, no monthly split.
        let component =
            scheme::compute_special_scheme(special, rule, input, &base_result.bases, &base_result.debug);
        let upfront_totals =
            TaxTotals { total_tax: component.amount, component_taxes: vec![component] };
        let zero_totals = TaxTotals { component_taxes: vec![], total_tax: Money::ZERO };

        let credit = reciprocity::resolve_reciprocity_credit(
            rule,
            input,
            upfront_totals.total_tax,
            rust_decimal::Decimal::ZERO,
            base_result.bases.vehicle_base,
        );
        let mut debug = base_result.debug;
        debug.reciprocity_credit = credit;

        let net_upfront = (upfront_totals.total_tax - credit - input.tax_already_collected).clamp_zero();
        let total_over_term = net_upfront;

        let lease_breakdown = LeaseBreakdown {
            upfront_taxable_base: base_result.bases.total_taxable_base,
            upfront_taxes: TaxTotals { total_tax: net_upfront, component_taxes: upfront_totals.component_taxes },
            payment_taxable_base_per_period: Money::ZERO,
            payment_taxes_per_period: zero_totals,
            total_tax_over_term: total_over_term,
        };

        return Ok(TaxCalculationResult {
            mode: DealType::Lease,
            bases: base_result.bases,
            taxes: TaxTotals { component_taxes: vec![], total_tax: net_upfront },
            lease_breakdown: Some(lease_breakdown),
            debug,
        });
    }

    let partition = lease::partition_lease_base(
        rule,
        input,
        base_result.bases.vehicle_base,
        base_result.bases.fees_base,
        base_result.bases.products_base,
    );

    let luxury_trigger = base_result.bases.vehicle_base + base_result.bases.fees_base;
    let composed = rate::compose_rates(rule, DealType::Lease, &input.rates, luxury_trigger);

    let upfront_totals = lease::apply_rates_to_base(partition.upfront_taxable_base, &composed);
    let payment_totals = lease::apply_rates_to_base(partition.payment_taxable_base_per_period, &composed);

    let total_over_term = upfront_totals.total_tax
        + payment_totals.total_tax * rust_decimal::Decimal::from(input.payment_count);

    let state_rate = input
        .rates
        .iter()
        .find(|r| r.label.eq_ignore_ascii_case("STATE"))
        .map(|r| r.rate.as_decimal())
        .unwrap_or_default();

    let gross_tax = total_over_term;
    let credit = reciprocity::resolve_reciprocity_credit(
        rule,
        input,
        gross_tax,
        state_rate,
        base_result.bases.vehicle_base,
    );

    let mut debug = base_result.debug;
    debug.reciprocity_credit = credit;

    let net_total = (gross_tax - credit - input.tax_already_collected).clamp_zero();

    let lease_breakdown = LeaseBreakdown {
        upfront_taxable_base: partition.upfront_taxable_base,
        upfront_taxes: upfront_totals,
        payment_taxable_base_per_period: partition.payment_taxable_base_per_period,
        payment_taxes_per_period: payment_totals,
        total_tax_over_term: net_total,
    };

    Ok(TaxCalculationResult {
        mode: DealType::Lease,
        bases: base_result.bases,
        taxes: TaxTotals { component_taxes: collect_components(&lease_breakdown), total_tax: net_total },
        lease_breakdown: Some(lease_breakdown),
        debug,
    })
}

fn collect_components(breakdown: &LeaseBreakdown) -> Vec<ComponentTax> {
    let mut components = breakdown.upfront_taxes.component_taxes.clone();
    components.extend(breakdown.payment_taxes_per_period.component_taxes.clone());
    components
}

/// JSON convenience wrapper over [`calculate_tax`], for callers on the other
/// side of a data-only wire contract (the bridge process itself is out of scope).
pub fn calculate_tax_json(input_json: &str, rule_json: &str) -> TaxResult<String> {
    let input: DealInput = serde_json::from_str(input_json)
        .map_err(|e| crate::error::TaxError::invalid_input("input_json", e.to_string()))?;
    let rule: StateRule = serde_json::from_str(rule_json)
        .map_err(|e| crate::error::TaxError::invalid_input("rule_json", e.to_string()))?;
    let result = calculate_tax(&input, &rule)?;
    serde_json::to_string(&result)
        .map_err(|e| crate::error::TaxError::invalid_input("result", e.to_string()))
}
