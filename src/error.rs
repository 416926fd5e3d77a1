//! Typed error surface for the tax engine.
//!
//! Every fallible operation in this crate returns [`TaxResult`]. There is
//! one variant per failure kind the pipeline can produce; none of them are
//! recoverable inside the engine itself — a calculation either produces a
//! complete result or aborts with one of these.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds produced by the rule registry, resolver, and calculation engine.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum TaxError {
    /// `getRulesForState` returned nothing but the caller invoked the calculator.
    #[error("no rule registered for state {state}")]
    UnknownState { state: String },

    /// The matched rule's status is `STUB` (structurally valid, not populated).
    #[error("state {state} has a stub rule and cannot be used for calculation")]
    StubState { state: String },

    /// Structural validation failed when the rule was loaded. Fatal at registry construction.
    #[error("invalid rule for state {state}: {message}")]
    InvalidRule { state: String, message: String },

    /// The deal input failed validation (negative amount, missing lease field, bad payment count).
    #[error("invalid input field `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    /// The caller's rate list is empty/unusable for a scheme that needs a state component.
    #[error("invalid rates: {message}")]
    InvalidRates { message: String },

    /// An intermediate arithmetic result exceeded the representable fixed-decimal range.
    #[error("overflow or non-finite value computing {context}")]
    OverflowOrNonFinite { context: String },
}

impl TaxError {
    pub fn unknown_state(state: impl Into<String>) -> Self {
        TaxError::UnknownState { state: state.into() }
    }

    pub fn stub_state(state: impl Into<String>) -> Self {
        TaxError::StubState { state: state.into() }
    }

    pub fn invalid_rule(state: impl Into<String>, message: impl Into<String>) -> Self {
        TaxError::InvalidRule { state: state.into(), message: message.into() }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        TaxError::InvalidInput { field: field.into(), message: message.into() }
    }

    pub fn invalid_rates(message: impl Into<String>) -> Self {
        TaxError::InvalidRates { message: message.into() }
    }

    pub fn overflow(context: impl Into<String>) -> Self {
        TaxError::OverflowOrNonFinite { context: context.into() }
    }
}

/// Result alias used throughout the crate.
pub type TaxResult<T> = Result<T, TaxError>;
