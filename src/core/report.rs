use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::core::formatter::{format_period, format_quantity, format_usd, round_usd};
use crate::core::models::cost::{Report, TotalCost, UsageLineItem};
use crate::core::models::query::{
    CostAndUsage, MetricValue, ResultByTime, AMORTIZED_COST, USAGE_QUANTITY,
};
use crate::core::period::BillingPeriod;

#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("Cost query returned no results")]
    NoResults,
    #[error("Missing metric {metric} in {location}")]
    MissingMetric {
        metric: &'static str,
        location: String,
    },
    #[error("Missing {field} for metric {metric} in {location}")]
    MissingField {
        field: &'static str,
        metric: &'static str,
        location: String,
    },
    #[error("Invalid amount '{value}' for metric {metric} in {location}")]
    InvalidAmount {
        value: String,
        metric: &'static str,
        location: String,
    },
    #[error("Group {index} has {found} keys, expected service and usage type")]
    MalformedKeys { index: usize, found: usize },
}

/// Parse a Cost Explorer amount string without losing precision.
fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn first_result(response: &CostAndUsage) -> Result<&ResultByTime, ReportError> {
    response
        .results_by_time
        .first()
        .ok_or(ReportError::NoResults)
}

fn metric<'a>(
    metrics: &'a HashMap<String, MetricValue>,
    name: &'static str,
    location: &str,
) -> Result<&'a MetricValue, ReportError> {
    metrics.get(name).ok_or_else(|| ReportError::MissingMetric {
        metric: name,
        location: location.to_string(),
    })
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
    metric: &'static str,
    location: &str,
) -> Result<&'a str, ReportError> {
    value.as_deref().ok_or_else(|| ReportError::MissingField {
        field,
        metric,
        location: location.to_string(),
    })
}

fn metric_amount(
    value: &MetricValue,
    name: &'static str,
    location: &str,
) -> Result<Decimal, ReportError> {
    let raw = required(&value.amount, "Amount", name, location)?;
    parse_amount(raw).ok_or_else(|| ReportError::InvalidAmount {
        value: raw.to_string(),
        metric: name,
        location: location.to_string(),
    })
}

/// Extract the period's total amortized cost.
pub fn build_total(
    period: BillingPeriod,
    response: &CostAndUsage,
) -> Result<TotalCost, ReportError> {
    let result = first_result(response)?;
    let value = metric(&result.total, AMORTIZED_COST, "Total")?;
    let amount = metric_amount(value, AMORTIZED_COST, "Total")?;
    Ok(TotalCost { period, amount })
}

/// One line item per (service, usage type) group, in upstream order.
///
/// Usage quantities are display-only and kept as the reported text.
pub fn build_line_items(
    period: BillingPeriod,
    response: &CostAndUsage,
) -> Result<Vec<UsageLineItem>, ReportError> {
    let result = first_result(response)?;
    debug!(
        start = %period.start,
        end = %period.end,
        groups = result.groups.len(),
        "Building usage line items"
    );

    result
        .groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let (service_name, usage_type) = match group.keys.as_slice() {
                [service, usage_type, ..] => (service.clone(), usage_type.clone()),
                keys => {
                    return Err(ReportError::MalformedKeys {
                        index,
                        found: keys.len(),
                    })
                }
            };
            let location = format!("group {}/{}", service_name, usage_type);

            let cost = metric(&group.metrics, AMORTIZED_COST, &location)?;
            let amount = metric_amount(cost, AMORTIZED_COST, &location)?;

            let usage = metric(&group.metrics, USAGE_QUANTITY, &location)?;
            let usage_quantity = required(&usage.amount, "Amount", USAGE_QUANTITY, &location)?;
            let usage_unit = required(&usage.unit, "Unit", USAGE_QUANTITY, &location)?;

            Ok(UsageLineItem {
                service_name,
                usage_type,
                amount,
                usage_quantity: usage_quantity.to_string(),
                usage_unit: usage_unit.to_string(),
            })
        })
        .collect()
}

/// Render the notification title and detail.
///
/// Items whose amount rounds to 0.00 are left out of the detail.
pub fn render(total: &TotalCost, items: &[UsageLineItem]) -> Report {
    let title = format!(
        "{}の請求額は、{} USDです。",
        format_period(&total.period),
        format_usd(total.amount)
    );

    let detail = items
        .iter()
        .filter(|item| !round_usd(item.amount).is_zero())
        .map(|item| {
            format!(
                "- {}/{}: {} USD ({})",
                item.service_name,
                item.usage_type,
                format_usd(item.amount),
                format_quantity(&item.usage_quantity, &item.usage_unit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Report { title, detail }
}
