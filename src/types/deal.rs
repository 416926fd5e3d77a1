//! The calculator's input: a single deal to be taxed.
//!
//! This is deliberately narrow — no vehicle VIN/condition, no jurisdiction
//! lookup, no F&I product catalog. Those belong to the deal-structuring
//! system that produces this input, not to the tax calculator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Retail,
    Lease,
}

/// A caller-supplied named fee with a known or unknown code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherFee {
    pub code: String,
    pub amount: Money,
}

/// A single rate component as supplied by the caller (state/county/city/transit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateInput {
    pub label: String,
    pub rate: Rate,
}

/// Tax already paid in another state, used by the reciprocity resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginTaxInfo {
    pub state_code: String,
    pub amount: Money,
    pub effective_rate: Rate,
    pub tax_paid_date: NaiveDate,
}

/// The deal to calculate tax for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    pub state_code: String,
    pub as_of_date: NaiveDate,
    pub deal_type: DealType,

    // --- retail amounts ---
    #[serde(default)]
    pub vehicle_price: Money,
    #[serde(default)]
    pub accessories_amount: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    #[serde(default)]
    pub rebate_manufacturer: Money,
    #[serde(default)]
    pub rebate_dealer: Money,
    #[serde(default)]
    pub doc_fee: Money,
    #[serde(default)]
    pub other_fees: Vec<OtherFee>,
    #[serde(default)]
    pub service_contracts: Money,
    #[serde(default)]
    pub gap: Money,
    #[serde(default)]
    pub negative_equity: Money,
    #[serde(default)]
    pub tax_already_collected: Money,

    // --- lease amounts ---
    #[serde(default)]
    pub gross_cap_cost: Money,
    #[serde(default)]
    pub cap_reduction_cash: Money,
    #[serde(default)]
    pub cap_reduction_trade_in: Money,
    #[serde(default)]
    pub cap_reduction_rebate_manufacturer: Money,
    #[serde(default)]
    pub cap_reduction_rebate_dealer: Money,
    #[serde(default)]
    pub base_payment: Money,
    #[serde(default)]
    pub payment_count: u32,

    pub rates: Vec<RateInput>,

    #[serde(default)]
    pub origin_tax_info: Option<OriginTaxInfo>,
}

impl DealInput {
    /// All non-negativity-checked money fields, for validation.
    pub(crate) fn money_fields(&self) -> Vec<(&'static str, Decimal)> {
        vec![
            ("vehicle_price", self.vehicle_price.as_decimal()),
            ("accessories_amount", self.accessories_amount.as_decimal()),
            ("trade_in_value", self.trade_in_value.as_decimal()),
            ("rebate_manufacturer", self.rebate_manufacturer.as_decimal()),
            ("rebate_dealer", self.rebate_dealer.as_decimal()),
            ("doc_fee", self.doc_fee.as_decimal()),
            ("service_contracts", self.service_contracts.as_decimal()),
            ("gap", self.gap.as_decimal()),
            ("negative_equity", self.negative_equity.as_decimal()),
            ("tax_already_collected", self.tax_already_collected.as_decimal()),
            ("gross_cap_cost", self.gross_cap_cost.as_decimal()),
            ("cap_reduction_cash", self.cap_reduction_cash.as_decimal()),
            ("cap_reduction_trade_in", self.cap_reduction_trade_in.as_decimal()),
            (
                "cap_reduction_rebate_manufacturer",
                self.cap_reduction_rebate_manufacturer.as_decimal(),
            ),
            ("cap_reduction_rebate_dealer", self.cap_reduction_rebate_dealer.as_decimal()),
            ("base_payment", self.base_payment.as_decimal()),
        ]
    }
}
