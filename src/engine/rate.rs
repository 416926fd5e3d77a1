//! Rate composer: produces the ordered list of rate components that apply
//! to the vehicle base, including luxury-tier rate substitution and
//! lease-specific surcharges, per §4.4.

use crate::types::{DealType, Money, Rate, RateInput, StateRule};

#[derive(Debug, Clone, PartialEq)]
pub struct RateComponent {
    pub label: String,
    pub rate: Rate,
}

/// Whether the luxury rate was triggered, and the state component's rate to use.
pub struct ComposedRates {
    pub components: Vec<RateComponent>,
    pub luxury_triggered: bool,
}

const STATE_LABEL: &str = "STATE";

pub fn compose_rates(
    rule: &StateRule,
    mode: DealType,
    supplied: &[RateInput],
    luxury_trigger_base: Money,
) -> ComposedRates {
    use crate::types::VehicleTaxScheme::*;

    let mut components: Vec<RateComponent> = Vec::new();
    let mut luxury_triggered = false;

    match rule.vehicle_tax_scheme {
        SpecialTavt | SpecialHut | DmvPrivilegeTax => {
            // Special schemes synthesize their own single component downstream
            // in the tax applier; the composer contributes nothing here.
        }
        StateOnly => {
            if !rule.vehicle_uses_local_sales_tax {
                components.extend(supplied.iter().map(to_component));
            } else if let Some(state_rate) = supplied.iter().find(|r| is_state_label(&r.label)) {
                components.push(to_component(state_rate));
            }
        }
        LocalOnly => {
            components.extend(
                supplied
                    .iter()
                    .filter(|r| !is_state_label(&r.label))
                    .map(to_component),
            );
        }
        StatePlusLocal => {
            components.extend(supplied.iter().map(to_component));
        }
    }

    if let (Some(threshold), Some(luxury_rate)) =
        (rule.extras.luxury_threshold, rule.extras.luxury_rate)
    {
        if luxury_trigger_base.as_decimal() >= threshold {
            luxury_triggered = true;
            for component in components.iter_mut() {
                if is_state_label(&component.label) {
                    component.rate = luxury_rate;
                }
            }
        }
    }

    if mode == DealType::Lease {
        for surcharge in &rule.lease_rules.lease_surcharges {
            components.push(RateComponent { label: surcharge.label.clone(), rate: surcharge.rate });
        }
    }

    ComposedRates { components, luxury_triggered }
}

fn is_state_label(label: &str) -> bool {
    label.eq_ignore_ascii_case(STATE_LABEL)
}

fn to_component(input: &RateInput) -> RateComponent {
    RateComponent { label: input.label.clone(), rate: input.rate }
}
