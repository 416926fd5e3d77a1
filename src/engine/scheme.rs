//! Special-scheme dispatch: TAVT, HUT, DMV privilege tax, and Iowa's
//! one-time registration fee each replace the default per-component
//! multiplication with a single computed component, per §4.6.

use rust_decimal::Decimal;

use crate::types::{ComponentTax, DealInput, DealType, DebugTrace, SpecialSchemeConfig, StateRule, TaxBases};

/// The scheme governing this deal's mode, if any. `MdUpfrontGain` and `None`
/// are lease-aggregate adjustments handled in `engine::lease`, not a total
/// override of the default rate-composer/tax-applier path.
pub fn active_scheme(rule: &StateRule, mode: DealType) -> Option<&SpecialSchemeConfig> {
    let candidate = match mode {
        DealType::Lease => rule.lease_rules.special_scheme.as_ref().or(rule.special_scheme.as_ref()),
        DealType::Retail => rule.special_scheme.as_ref(),
    }?;
    match candidate {
        SpecialSchemeConfig::Tavt { .. }
        | SpecialSchemeConfig::Hut { .. }
        | SpecialSchemeConfig::Privilege { .. }
        | SpecialSchemeConfig::IowaFee { .. } => Some(candidate),
        SpecialSchemeConfig::MdUpfrontGain | SpecialSchemeConfig::None => None,
    }
}

pub fn compute_special_scheme(
    scheme: &SpecialSchemeConfig,
    rule: &StateRule,
    input: &DealInput,
    bases: &TaxBases,
    debug: &DebugTrace,
) -> ComponentTax {
    match scheme {
        SpecialSchemeConfig::Tavt { rate, allow_trade_in_credit } => {
            let fmv = match input.deal_type {
                DealType::Retail => input.vehicle_price.as_decimal(),
                DealType::Lease => input.gross_cap_cost.as_decimal(),
            };
            let trade_credit = if *allow_trade_in_credit {
                rule.trade_in_policy.admitted_credit(input.trade_in_value.as_decimal())
            } else {
                Decimal::ZERO
            };
            let base = (fmv - trade_credit).max(Decimal::ZERO);
            let amount = (base * rate.as_decimal()).round_dp(2);
            ComponentTax { label: "TAVT".to_string(), rate: *rate, amount: crate::types::Money::new(amount) }
        }
        SpecialSchemeConfig::Hut { rate, cap, .. } => {
            let negative_equity = if rule.tax_on_negative_equity {
                input.negative_equity.as_decimal()
            } else {
                Decimal::ZERO
            };
            let mut base = input.vehicle_price.as_decimal() + debug.taxable_doc_fee.as_decimal()
                - debug.applied_trade_in.as_decimal()
                + negative_equity
                + debug.applied_rebates_taxable.as_decimal();
            if let Some(cap) = cap {
                base = base.min(*cap);
            }
            base = base.max(Decimal::ZERO);
            let amount = (base * rate.as_decimal()).round_dp(2);
            ComponentTax { label: "HUT".to_string(), rate: *rate, amount: crate::types::Money::new(amount) }
        }
        SpecialSchemeConfig::Privilege { rate } => {
            let amount = (bases.vehicle_base.as_decimal() * rate.as_decimal()).round_dp(2);
            ComponentTax {
                label: "PRIVILEGE_TAX".to_string(),
                rate: *rate,
                amount: crate::types::Money::new(amount),
            }
        }
        SpecialSchemeConfig::IowaFee { base_rate, flat_component } => {
            let base = match input.deal_type {
                DealType::Retail => {
                    let credit = rule.trade_in_policy.admitted_credit(input.trade_in_value.as_decimal());
                    (input.vehicle_price.as_decimal() - credit).max(Decimal::ZERO)
                }
                DealType::Lease => {
                    let aggregate = input.base_payment.as_decimal()
                        * Decimal::from(input.payment_count)
                        + input.trade_in_value.as_decimal();
                    aggregate.max(Decimal::ZERO)
                }
            };
            let amount = (*flat_component + base_rate.as_decimal() * base).round_dp(2);
            ComponentTax {
                label: "IOWA_FEE".to_string(),
                rate: *base_rate,
                amount: crate::types::Money::new(amount),
            }
        }
        SpecialSchemeConfig::MdUpfrontGain | SpecialSchemeConfig::None => unreachable!(
            "active_scheme filters out lease-aggregate-only and no-op scheme variants"
        ),
    }
}
