use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::period::BillingPeriod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalCost {
    pub period: BillingPeriod,
    /// Amortized cost in USD, unrounded
    pub amount: Decimal,
}

/// Cost of one (service, usage type) pair within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLineItem {
    pub service_name: String,
    pub usage_type: String,
    /// Amortized cost in USD, unrounded
    pub amount: Decimal,
    /// Quantity exactly as reported, e.g. "10.0" or "1.5E-7"
    pub usage_quantity: String,
    /// Unit reported for the quantity (e.g., "GB", "Hrs")
    pub usage_unit: String,
}

/// Rendered notification text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub detail: String,
}

/// Outcome of one report run, suitable for logging or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub status_code: u16,
    pub message: String,
    pub total_billing: TotalCost,
    pub service_billings: Vec<UsageLineItem>,
    pub title: String,
    pub detail: String,
    /// Whether the webhook accepted the message
    pub delivered: bool,
}
