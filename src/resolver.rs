//! The state resolver: chooses which state's rule governs a deal.
//!
//! The precedence is encoded as a fixed, enumerable sequence of decision
//! rules (force overrides, then perspective dispatch, then fallbacks)
//! rather than nested conditionals, so each step is independently testable.

use crate::types::{DealParties, RooftopConfig, StateOverride, TaxContext, TaxPerspective};

/// Resolve the tax context for a deal. Never fails: missing inputs resolve
/// via the documented fallback chain.
pub fn resolve_tax_context(rooftop: &RooftopConfig, parties: &DealParties) -> TaxContext {
    let dealer_state = rooftop.dealer_state_code.clone();
    let buyer_state = parties.buyer_residence_state.clone();
    let registration_state = parties.registration_state.clone();

    let primary = resolve_primary(rooftop, &dealer_state, &buyer_state, &registration_state);

    TaxContext {
        primary_state_code: primary,
        dealer_state_code: dealer_state.clone(),
        buyer_residence_state_code: buyer_state.unwrap_or_else(|| {
            registration_state.clone().unwrap_or_else(|| dealer_state.clone())
        }),
        registration_state_code: registration_state.unwrap_or_else(|| {
            parties
                .buyer_residence_state
                .clone()
                .unwrap_or_else(|| dealer_state.clone())
        }),
    }
}

fn override_for<'a>(rooftop: &'a RooftopConfig, state: &str) -> Option<&'a StateOverride> {
    rooftop.state_overrides.get(&state.to_uppercase())
}

fn resolve_primary(
    rooftop: &RooftopConfig,
    dealer_state: &str,
    buyer_state: &Option<String>,
    registration_state: &Option<String>,
) -> String {
    // 1. Force overrides. Registration wins over buyer residence when both
    //    declare force_primary (§9 open-question resolution).
    if let Some(reg) = registration_state {
        if override_for(rooftop, reg).map(|o| o.force_primary).unwrap_or(false) {
            return reg.clone();
        }
    }
    if let Some(buyer) = buyer_state {
        if buyer.to_uppercase() != dealer_state.to_uppercase()
            && override_for(rooftop, buyer).map(|o| o.force_primary).unwrap_or(false)
        {
            return buyer.clone();
        }
    }

    // 2. Perspective dispatch.
    match rooftop.default_tax_perspective {
        TaxPerspective::RegistrationState => {
            if let Some(reg) = registration_state {
                let disallowed =
                    override_for(rooftop, reg).map(|o| o.disallow_primary).unwrap_or(false);
                if !disallowed {
                    return reg.clone();
                }
                // registration_state is disallowed; don't re-derive it below.
                return fallback_to_dealer_or_buyer(dealer_state, buyer_state.as_deref(), None);
            }
            fallback_to_dealer_or_buyer(dealer_state, buyer_state.as_deref(), registration_state.as_deref())
        }
        TaxPerspective::DealerState => {
            if let Some(reg) = registration_state {
                if override_for(rooftop, reg).map(|o| o.disallow_primary).unwrap_or(false) {
                    return reg.clone();
                }
            }
            dealer_state.to_string()
        }
        TaxPerspective::BuyerState => {
            if let Some(buyer) = buyer_state {
                let allowed = rooftop
                    .allowed_registration_states
                    .contains(&buyer.to_uppercase());
                if buyer.to_uppercase() != dealer_state.to_uppercase() && allowed {
                    return buyer.clone();
                }
                // buyer_state was rejected (same as dealer, or not allowed);
                // don't re-derive it below.
                return fallback_to_dealer_or_buyer(dealer_state, None, registration_state.as_deref());
            }
            fallback_to_dealer_or_buyer(dealer_state, buyer_state.as_deref(), registration_state.as_deref())
        }
    }
}

fn fallback_to_dealer_or_buyer(
    dealer_state: &str,
    buyer_state: Option<&str>,
    registration_state: Option<&str>,
) -> String {
    // 3. Fallbacks: missing buyer -> registration, missing registration -> buyer,
    //    both missing -> dealer.
    if let Some(reg) = registration_state {
        return reg.to_string();
    }
    if let Some(buyer) = buyer_state {
        return buyer.to_string();
    }
    dealer_state.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parties(buyer: Option<&str>, registration: Option<&str>) -> DealParties {
        DealParties {
            buyer_residence_state: buyer.map(|s| s.to_string()),
            registration_state: registration.map(|s| s.to_string()),
        }
    }

    #[test]
    fn resolver_never_fails_on_missing_parties() {
        let rooftop = RooftopConfig::simple("CT", None);
        let ctx = resolve_tax_context(&rooftop, &DealParties::default());
        assert_eq!(ctx.primary_state_code, "CT");
        assert_eq!(ctx.dealer_state_code, "CT");
    }

    #[test]
    fn registration_perspective_uses_registration_state() {
        let rooftop =
            RooftopConfig::multi_state("CT", &["NY"], Some(TaxPerspective::RegistrationState), None);
        let ctx = resolve_tax_context(&rooftop, &parties(Some("NY"), Some("NY")));
        assert_eq!(ctx.primary_state_code, "NY");
    }

    #[test]
    fn registration_wins_when_both_force_primary_conflict() {
        let mut rooftop =
            RooftopConfig::multi_state("CT", &["NY", "MA"], Some(TaxPerspective::DealerState), None);
        rooftop
            .state_overrides
            .insert("NY".to_string(), StateOverride { disallow_primary: false, force_primary: true });
        rooftop
            .state_overrides
            .insert("MA".to_string(), StateOverride { disallow_primary: false, force_primary: true });
        let ctx = resolve_tax_context(&rooftop, &parties(Some("MA"), Some("NY")));
        assert_eq!(ctx.primary_state_code, "NY");
    }

    #[test]
    fn resolver_is_idempotent() {
        let rooftop = RooftopConfig::multi_state("CT", &["NY"], None, None);
        let p = parties(Some("NY"), None);
        let first = resolve_tax_context(&rooftop, &p);
        let second = resolve_tax_context(&rooftop, &p);
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_buyer_missing_uses_registration() {
        let rooftop = RooftopConfig::simple("CT", None);
        let ctx = resolve_tax_context(&rooftop, &parties(None, Some("NY")));
        assert_eq!(ctx.buyer_residence_state_code, "NY");
    }

    #[test]
    fn multi_state_and_involved_states_helpers() {
        let rooftop = RooftopConfig::multi_state("CT", &["NY"], Some(TaxPerspective::RegistrationState), None);
        let ctx = resolve_tax_context(&rooftop, &parties(Some("NY"), Some("NY")));
        assert!(ctx.is_multi_state_deal());
        assert_eq!(ctx.involved_states(), vec!["CT".to_string(), "NY".to_string()]);
    }

    #[test]
    fn empty_overrides_map_does_not_panic() {
        let rooftop = RooftopConfig {
            state_overrides: HashMap::new(),
            ..RooftopConfig::simple("TX", None)
        };
        let ctx = resolve_tax_context(&rooftop, &DealParties::default());
        assert_eq!(ctx.primary_state_code, "TX");
    }

    #[test]
    fn disallowed_registration_state_falls_through_to_dealer() {
        let mut rooftop =
            RooftopConfig::multi_state("CT", &["NY"], Some(TaxPerspective::RegistrationState), None);
        rooftop
            .state_overrides
            .insert("NY".to_string(), StateOverride { disallow_primary: true, force_primary: false });
        let ctx = resolve_tax_context(&rooftop, &parties(None, Some("NY")));
        assert_eq!(ctx.primary_state_code, "CT");
    }

    #[test]
    fn disallowed_buyer_state_falls_through_to_registration_then_dealer() {
        let rooftop =
            RooftopConfig::multi_state("CT", &["NY"], Some(TaxPerspective::BuyerState), None);
        // "MA" is not in allowed_registration_states, so the buyer candidate is rejected.
        let ctx = resolve_tax_context(&rooftop, &parties(Some("MA"), Some("NY")));
        assert_eq!(ctx.primary_state_code, "NY");

        let ctx_no_registration = resolve_tax_context(&rooftop, &parties(Some("MA"), None));
        assert_eq!(ctx_no_registration.primary_state_code, "CT");
    }
}
