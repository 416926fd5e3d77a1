//! Input normalizer: validates a `DealInput` and fills lease/retail
//! defaults so the rest of the pipeline never has to special-case mode.

use crate::error::{TaxError, TaxResult};
use crate::types::{DealInput, DealType};

/// Validate a deal input. Does not mutate it — lease/retail fields the
/// engine doesn't need for the given mode are simply ignored downstream,
/// per §3's "coerced to zero" rule (they already default to `Money::ZERO`
/// at construction, so there is nothing to coerce here).
pub fn normalize(input: &DealInput) -> TaxResult<()> {
    for (field, value) in input.money_fields() {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(TaxError::invalid_input(field, "must not be negative"));
        }
    }

    if input.deal_type == DealType::Lease && input.payment_count == 0 {
        return Err(TaxError::invalid_input(
            "payment_count",
            "must be greater than zero for a lease",
        ));
    }

    if input.deal_type == DealType::Lease && input.base_payment.is_zero() && input.gross_cap_cost.is_zero()
    {
        return Err(TaxError::invalid_input(
            "base_payment",
            "lease deals require a base_payment or gross_cap_cost",
        ));
    }

    if input.state_code.len() != 2 {
        return Err(TaxError::invalid_input("state_code", "must be a two-letter code"));
    }

    Ok(())
}
