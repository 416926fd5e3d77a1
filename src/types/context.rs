//! State resolution: which state's rule governs a multi-state deal.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which party's state the dealer's default perspective favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPerspective {
    DealerState,
    RegistrationState,
    BuyerState,
}

/// Per-state exception to the rooftop's default perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOverride {
    #[serde(default)]
    pub disallow_primary: bool,
    #[serde(default)]
    pub force_primary: bool,
}

/// A dealer site's tax-resolution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooftopConfig {
    pub id: String,
    pub name: String,
    pub dealer_state_code: String,
    pub default_tax_perspective: TaxPerspective,
    #[serde(default)]
    pub allowed_registration_states: HashSet<String>,
    #[serde(default)]
    pub state_overrides: HashMap<String, StateOverride>,
}

impl RooftopConfig {
    /// A single-state rooftop using the dealer-state perspective.
    pub fn simple(state_code: impl Into<String>, name: Option<String>) -> Self {
        let state_code = state_code.into();
        let mut allowed = HashSet::new();
        allowed.insert(state_code.clone());
        RooftopConfig {
            id: format!("rooftop-{state_code}"),
            name: name.unwrap_or_else(|| format!("{state_code} Rooftop")),
            dealer_state_code: state_code,
            default_tax_perspective: TaxPerspective::DealerState,
            allowed_registration_states: allowed,
            state_overrides: HashMap::new(),
        }
    }

    /// A multi-state rooftop resolving by registration state by default.
    pub fn multi_state(
        dealer_state: impl Into<String>,
        additional_states: &[&str],
        perspective: Option<TaxPerspective>,
        name: Option<String>,
    ) -> Self {
        let dealer_state = dealer_state.into();
        let mut allowed = HashSet::new();
        allowed.insert(dealer_state.clone());
        allowed.extend(additional_states.iter().map(|s| s.to_uppercase()));
        RooftopConfig {
            id: format!("rooftop-{dealer_state}-multi"),
            name: name.unwrap_or_else(|| format!("{dealer_state} Multi-State Rooftop")),
            dealer_state_code: dealer_state,
            default_tax_perspective: perspective.unwrap_or(TaxPerspective::RegistrationState),
            allowed_registration_states: allowed,
            state_overrides: HashMap::new(),
        }
    }
}

/// The buyer-side facts needed to resolve a deal's tax context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealParties {
    #[serde(default)]
    pub buyer_residence_state: Option<String>,
    #[serde(default)]
    pub registration_state: Option<String>,
}

/// The resolved state context for a deal: which state's rule governs, plus
/// every state otherwise party to the transaction (for reciprocity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxContext {
    pub primary_state_code: String,
    pub dealer_state_code: String,
    pub buyer_residence_state_code: String,
    pub registration_state_code: String,
}

impl TaxContext {
    pub fn is_multi_state_deal(&self) -> bool {
        let states = [
            &self.primary_state_code,
            &self.dealer_state_code,
            &self.buyer_residence_state_code,
            &self.registration_state_code,
        ];
        states.iter().any(|s| **s != self.primary_state_code)
    }

    pub fn involved_states(&self) -> Vec<String> {
        let mut states = vec![
            self.primary_state_code.clone(),
            self.dealer_state_code.clone(),
            self.buyer_residence_state_code.clone(),
            self.registration_state_code.clone(),
        ];
        states.sort();
        states.dedup();
        states
    }
}
