//! Reciprocity resolver: credits tax already paid in another state against
//! this state's tax, subject to scope, cap, time window, and per-origin
//! override, per §4.7.

use rust_decimal::Decimal;

use crate::types::{
    DealInput, DealType, HomeStateBehavior, Money, ReciprocityBasis, ReciprocityScope, StateRule,
};

pub fn resolve_reciprocity_credit(
    rule: &StateRule,
    input: &DealInput,
    gross_tax: Money,
    state_rate: Decimal,
    vehicle_base: Money,
) -> Money {
    let reciprocity = &rule.reciprocity;

    if !reciprocity.enabled {
        return Money::ZERO;
    }

    let mode_scope = match input.deal_type {
        DealType::Retail => ReciprocityScope::Retail,
        DealType::Lease => ReciprocityScope::Lease,
    };
    if !scope_includes(reciprocity.scope, mode_scope) {
        return Money::ZERO;
    }

    let Some(origin) = &input.origin_tax_info else {
        return Money::ZERO;
    };

    let mut effective_scope = reciprocity.scope;
    let mut effective_home_state_behavior = reciprocity.home_state_behavior;

    if let Some(over) = reciprocity.override_for(&origin.state_code) {
        if over.disallow_credit {
            return Money::ZERO;
        }
        if let Some(scope_override) = over.scope_override.or(over.mode_override) {
            effective_scope = scope_override;
        }
        if !scope_includes(effective_scope, mode_scope) {
            return Money::ZERO;
        }
        if let Some(max_age) = over.max_age_days_since_tax_paid {
            let age_days = (input.as_of_date - origin.tax_paid_date).num_days();
            if age_days > max_age {
                return Money::ZERO;
            }
        }
        if matches!(reciprocity.home_state_behavior, HomeStateBehavior::HomeStateOnly) {
            effective_home_state_behavior = HomeStateBehavior::HomeStateOnly;
        }
    }

    let origin_amount = match reciprocity.basis {
        ReciprocityBasis::TaxPaid => origin.amount,
        ReciprocityBasis::TaxDue => {
            Money::new((vehicle_base.as_decimal() * origin.effective_rate.as_decimal()).round_dp(2))
        }
    };

    let credit = match effective_home_state_behavior {
        HomeStateBehavior::None => Money::ZERO,
        HomeStateBehavior::HomeStateOnly => gross_tax,
        HomeStateBehavior::CreditFull => {
            if reciprocity.cap_at_this_states_tax {
                origin_amount.min(gross_tax)
            } else {
                origin_amount
            }
        }
        HomeStateBehavior::CreditUpToStateRate => {
            let state_rate_amount = Money::new((vehicle_base.as_decimal() * state_rate).round_dp(2));
            origin_amount.min(state_rate_amount)
        }
    };

    if reciprocity.cap_at_this_states_tax {
        credit.min(gross_tax)
    } else {
        credit
    }
}

fn scope_includes(scope: ReciprocityScope, mode: ReciprocityScope) -> bool {
    matches!(scope, ReciprocityScope::Both) || scope == mode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::types::{DealType, OriginTaxInfo, RateInput, Rate};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn nc_input_with_origin(days_ago: i64) -> DealInput {
        DealInput {
            state_code: "NC".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            deal_type: DealType::Retail,
            vehicle_price: Money::new(dec!(30000)),
            accessories_amount: Money::ZERO,
            trade_in_value: Money::ZERO,
            rebate_manufacturer: Money::ZERO,
            rebate_dealer: Money::ZERO,
            doc_fee: Money::ZERO,
            other_fees: vec![],
            service_contracts: Money::new(dec!(2500)),
            gap: Money::new(dec!(795)),
            negative_equity: Money::ZERO,
            tax_already_collected: Money::ZERO,
            gross_cap_cost: Money::ZERO,
            cap_reduction_cash: Money::ZERO,
            cap_reduction_trade_in: Money::ZERO,
            cap_reduction_rebate_manufacturer: Money::ZERO,
            cap_reduction_rebate_dealer: Money::ZERO,
            base_payment: Money::ZERO,
            payment_count: 0,
            rates: vec![RateInput { label: "STATE".to_string(), rate: Rate::from_percentage(dec!(3.0)) }],
            origin_tax_info: Some(OriginTaxInfo {
                state_code: "SC".to_string(),
                amount: Money::new(dec!(1500)),
                effective_rate: Rate::from_percentage(dec!(5.0)),
                tax_paid_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() - chrono::Duration::days(days_ago),
            }),
        }
    }

    #[test]
    fn nc_reciprocity_expires_after_90_days() {
        let registry = RuleRegistry::new().unwrap();
        let rule = registry.get_rules_for_state("NC").unwrap();
        let input = nc_input_with_origin(120);
        let credit = resolve_reciprocity_credit(
            rule,
            &input,
            Money::new(dec!(900)),
            dec!(0.03),
            Money::new(dec!(30000)),
        );
        assert_eq!(credit.as_decimal(), dec!(0));
    }

    #[test]
    fn nc_reciprocity_applies_within_window() {
        let registry = RuleRegistry::new().unwrap();
        let rule = registry.get_rules_for_state("NC").unwrap();
        let input = nc_input_with_origin(30);
        let credit = resolve_reciprocity_credit(
            rule,
            &input,
            Money::new(dec!(900)),
            dec!(0.03),
            Money::new(dec!(30000)),
        );
        assert!(credit.as_decimal() > dec!(0));
    }
}
