//! Tax applier: multiplies bases by composed rates, with the state-only
//! trade-in exception, the warranty flat-rate exception, and the special
//! scheme overrides of §4.5/§4.6.

use crate::types::{ComponentTax, DealInput, DebugTrace, Money, StateRule, TaxBases, TaxTotals};

use super::rate::ComposedRates;
use super::scheme;

pub struct ApplyContext<'a> {
    pub rule: &'a StateRule,
    pub bases: TaxBases,
    pub composed: ComposedRates,
    pub applied_trade_in_state_only: Money,
    pub input: &'a DealInput,
    pub debug: &'a DebugTrace,
}

pub fn apply_tax(ctx: ApplyContext<'_>) -> TaxTotals {
    if let Some(special) = scheme::active_scheme(ctx.rule, ctx.input.deal_type) {
        let component = scheme::compute_special_scheme(special, ctx.rule, ctx.input, &ctx.bases, ctx.debug);
        return TaxTotals { total_tax: component.amount, component_taxes: vec![component] };
    }

    let warranty_amount = match ctx.rule.extras.warranty_rate {
        Some(_) => ctx.debug.taxable_service_contracts,
        None => Money::ZERO,
    };

    let mut component_taxes = Vec::new();

    if let Some(warranty_rate) = ctx.rule.extras.warranty_rate {
        if !warranty_amount.is_zero() {
            component_taxes.push(ComponentTax {
                label: "WARRANTY".to_string(),
                rate: warranty_rate,
                amount: (warranty_amount * warranty_rate.as_decimal()).round_cents(),
            });
        }
    }

    for component in &ctx.composed.components {
        let mut base = (ctx.bases.total_taxable_base - warranty_amount).clamp_zero();
        if component.label.eq_ignore_ascii_case("STATE") {
            base = (base - ctx.applied_trade_in_state_only).clamp_zero();
        }
        let amount = (base * component.rate.as_decimal()).round_cents();
        component_taxes.push(ComponentTax { label: component.label.clone(), rate: component.rate, amount });
    }

    let total_tax = component_taxes
        .iter()
        .fold(Money::ZERO, |acc, c| acc + c.amount);

    TaxTotals { component_taxes, total_tax }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::base::build_base;
    use crate::engine::rate::compose_rates;
    use crate::registry::RuleRegistry;
    use crate::types::{DealType, RateInput, Rate};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ct_input(vehicle_price: rust_decimal::Decimal, trade_in: rust_decimal::Decimal) -> DealInput {
        DealInput {
            state_code: "CT".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            deal_type: DealType::Retail,
            vehicle_price: Money::new(vehicle_price),
            accessories_amount: Money::ZERO,
            trade_in_value: Money::new(trade_in),
            rebate_manufacturer: Money::ZERO,
            rebate_dealer: Money::ZERO,
            doc_fee: Money::new(dec!(500)),
            other_fees: vec![],
            service_contracts: Money::ZERO,
            gap: Money::ZERO,
            negative_equity: Money::ZERO,
            tax_already_collected: Money::ZERO,
            gross_cap_cost: Money::ZERO,
            cap_reduction_cash: Money::ZERO,
            cap_reduction_trade_in: Money::ZERO,
            cap_reduction_rebate_manufacturer: Money::ZERO,
            cap_reduction_rebate_dealer: Money::ZERO,
            base_payment: Money::ZERO,
            payment_count: 0,
            rates: vec![RateInput { label: "STATE".to_string(), rate: Rate::from_percentage(dec!(6.35)) }],
            origin_tax_info: None,
        }
    }

    #[test]
    fn ct_standard_purchase_matches_scenario_one() {
        let registry = RuleRegistry::new().unwrap();
        let rule = registry.get_rules_for_state("CT").unwrap();
        let input = ct_input(dec!(30000), dec!(0));
        let base_result = build_base(rule, &input);
        let luxury_trigger = input.vehicle_price + input.doc_fee;
        let composed = compose_rates(rule, DealType::Retail, &input.rates, luxury_trigger);
        let totals = apply_tax(ApplyContext {
            rule,
            bases: base_result.bases,
            composed,
            applied_trade_in_state_only: base_result.applied_trade_in_state_only,
            input: &input,
            debug: &base_result.debug,
        });
        assert_eq!(totals.total_tax.as_decimal(), dec!(1936.75));
    }

    #[test]
    fn ct_luxury_with_trade_in_matches_scenario_two() {
        let registry = RuleRegistry::new().unwrap();
        let rule = registry.get_rules_for_state("CT").unwrap();
        let input = ct_input(dec!(52000), dec!(10000));
        let base_result = build_base(rule, &input);
        let luxury_trigger = input.vehicle_price + input.doc_fee;
        let composed = compose_rates(rule, DealType::Retail, &input.rates, luxury_trigger);
        assert!(composed.luxury_triggered);
        let totals = apply_tax(ApplyContext {
            rule,
            bases: base_result.bases,
            composed,
            applied_trade_in_state_only: base_result.applied_trade_in_state_only,
            input: &input,
            debug: &base_result.debug,
        });
        assert_eq!(totals.total_tax.as_decimal(), dec!(3293.75));
    }
}
