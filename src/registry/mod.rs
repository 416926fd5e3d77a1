//! The rule registry: owns the `state code -> StateRule` mapping.
//!
//! Rules are loaded once at construction and validated structurally; a
//! registry that fails validation refuses to construct at all (`new`
//! returns a `TaxResult`), matching the source's "fatal at load" policy.

mod data;

use std::collections::HashMap;

use crate::error::{TaxError, TaxResult};
use crate::types::StateRule;

/// Owns every state's rule after structural validation.
pub struct RuleRegistry {
    rules: HashMap<String, StateRule>,
}

impl RuleRegistry {
    /// Build the registry from the built-in rule set, validating every rule.
    /// Fails fast on the first structurally invalid rule.
    pub fn new() -> TaxResult<Self> {
        let rules = data::builtin_rules();
        let mut by_code = HashMap::with_capacity(rules.len());
        for rule in rules {
            rule.validate()
                .map_err(|message| TaxError::invalid_rule(rule.state_code.clone(), message))?;
            by_code.insert(rule.state_code.clone(), rule);
        }
        Ok(RuleRegistry { rules: by_code })
    }

    /// Case-insensitive lookup; returns `None` for unknown or malformed codes.
    pub fn get_rules_for_state(&self, code: &str) -> Option<&StateRule> {
        let upper = code.to_uppercase();
        self.rules.get(&upper)
    }

    /// All 50 canonical state codes, regardless of implementation status.
    pub fn get_all_state_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rules.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// `true` when the rule for `code` exists and is not a stub.
    pub fn is_state_implemented(&self, code: &str) -> bool {
        self.get_rules_for_state(code)
            .map(|r| !r.is_stub())
            .unwrap_or(false)
    }

    pub fn get_implemented_states(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .rules
            .values()
            .filter(|r| !r.is_stub())
            .map(|r| r.state_code.clone())
            .collect();
        codes.sort();
        codes
    }

    pub fn get_stub_states(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .rules
            .values()
            .filter(|r| r.is_stub())
            .map(|r| r.state_code.clone())
            .collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_and_covers_all_50_states() {
        let registry = RuleRegistry::new().expect("registry should validate");
        assert_eq!(registry.get_all_state_codes().len(), 50);
    }

    #[test]
    fn implemented_and_stub_partition_covers_everything_disjointly() {
        let registry = RuleRegistry::new().unwrap();
        let all = registry.get_all_state_codes();
        let mut implemented = registry.get_implemented_states();
        let mut stubs = registry.get_stub_states();
        assert_eq!(implemented.len() + stubs.len(), all.len());
        implemented.sort();
        stubs.sort();
        for code in &implemented {
            assert!(!stubs.contains(code));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = RuleRegistry::new().unwrap();
        let upper = registry.get_rules_for_state("CT").cloned();
        let lower = registry.get_rules_for_state("ct").cloned();
        let mixed = registry.get_rules_for_state("Ct").cloned();
        assert!(upper.is_some());
        assert_eq!(upper, lower);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn unknown_code_returns_none() {
        let registry = RuleRegistry::new().unwrap();
        assert!(registry.get_rules_for_state("ZZ").is_none());
    }
}
