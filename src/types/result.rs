//! The calculator's output: a decomposed tax result plus a debug trace.

use serde::{Deserialize, Serialize};

use super::deal::DealType;
use super::money::{Money, Rate};

/// One rate component's contribution to the total tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTax {
    pub label: String,
    pub rate: Rate,
    pub amount: Money,
}

/// The taxable bases the engine computed before rates were applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBases {
    pub vehicle_base: Money,
    pub fees_base: Money,
    pub products_base: Money,
    pub total_taxable_base: Money,
}

/// Summed componentTaxes, before reciprocity credit and prior collection are netted out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTotals {
    pub component_taxes: Vec<ComponentTax>,
    pub total_tax: Money,
}

/// Lease-specific timing split: what's due at signing vs. over the payment stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseBreakdown {
    pub upfront_taxable_base: Money,
    pub upfront_taxes: TaxTotals,
    pub payment_taxable_base_per_period: Money,
    pub payment_taxes_per_period: TaxTotals,
    pub total_tax_over_term: Money,
}

/// A taxable or non-taxable fee, recorded for the debug trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTrace {
    pub code: String,
    pub amount: Money,
}

/// Explains which admissions the base builder and reciprocity resolver made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugTrace {
    pub applied_trade_in: Money,
    pub applied_rebates_non_taxable: Money,
    pub applied_rebates_taxable: Money,
    pub taxable_doc_fee: Money,
    pub taxable_fees: Vec<FeeTrace>,
    pub taxable_service_contracts: Money,
    pub taxable_gap: Money,
    pub reciprocity_credit: Money,
    pub notes: Vec<String>,
}

/// The full result of a single `calculate_tax` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub mode: DealType,
    pub bases: TaxBases,
    pub taxes: TaxTotals,
    #[serde(default)]
    pub lease_breakdown: Option<LeaseBreakdown>,
    pub debug: DebugTrace,
}
