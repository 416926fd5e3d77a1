//! `LeasePartition`: unifies the three lease timing methods (`Monthly`,
//! `FullUpfront`, `Hybrid`) behind one accumulator, per §9's redesign
//! mandate. Each method is a thin configuration over the same builder
//! rather than a separate code path.

use rust_decimal::Decimal;

use crate::types::{
    ComponentTax, DealInput, LeaseMethod, Money, SpecialSchemeConfig, StateRule, TaxTotals,
};

use super::rate::ComposedRates;

/// The upfront/per-period split of the taxable base, before rates are applied.
pub struct LeasePartition {
    pub upfront_taxable_base: Money,
    pub payment_taxable_base_per_period: Money,
}

pub fn partition_lease_base(
    rule: &StateRule,
    input: &DealInput,
    vehicle_base: Money,
    fees_base: Money,
    products_base: Money,
) -> LeasePartition {
    let lease = &rule.lease_rules;
    let taxable_cap_reduction_cash =
        if lease.tax_cap_reduction { input.cap_reduction_cash } else { Money::ZERO };

    match lease.method {
        LeaseMethod::FullUpfront => {
            let mut upfront = vehicle_base + fees_base + products_base
                + (input.base_payment * Decimal::from(input.payment_count));
            if matches!(lease.special_scheme, Some(SpecialSchemeConfig::MdUpfrontGain)) {
                // Maryland-style upfront-gain adjustment: the cap-cost reduction
                // cash is folded into the upfront aggregate rather than spread
                // across the payment stream.
                upfront = upfront + input.cap_reduction_cash;
            }
            LeasePartition {
                upfront_taxable_base: upfront,
                payment_taxable_base_per_period: Money::ZERO,
            }
        }
        LeaseMethod::Monthly => {
            let upfront = if lease.tax_fees_upfront { fees_base + products_base } else { Money::ZERO };
            LeasePartition {
                upfront_taxable_base: upfront,
                payment_taxable_base_per_period: input.base_payment,
            }
        }
        LeaseMethod::Hybrid => {
            let upfront = if lease.tax_cap_reduction {
                taxable_cap_reduction_cash + fees_base
            } else {
                fees_base
            };
            LeasePartition {
                upfront_taxable_base: upfront,
                payment_taxable_base_per_period: input.base_payment,
            }
        }
    }
}

/// Apply a flat set of rate components to a single base, producing `TaxTotals`.
pub fn apply_rates_to_base(base: Money, components: &ComposedRates) -> TaxTotals {
    let component_taxes: Vec<ComponentTax> = components
        .components
        .iter()
        .map(|c| ComponentTax {
            label: c.label.clone(),
            rate: c.rate,
            amount: (base * c.rate.as_decimal()).round_cents(),
        })
        .collect();
    let total_tax = component_taxes.iter().fold(Money::ZERO, |acc, c| acc + c.amount);
    TaxTotals { component_taxes, total_tax }
}
