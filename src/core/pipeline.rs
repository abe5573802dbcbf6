use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::models::cost::Invocation;
use crate::core::notify::{deliver, Notifier};
use crate::core::period;
use crate::core::report;
use crate::core::sources::{CostQuery, CostSource};

/// Resolve the period, query both cost views, build the report and make one
/// delivery attempt.
///
/// Query or response errors abort the run. Delivery failure only clears
/// `Invocation::delivered`.
pub async fn run_once(
    today: NaiveDate,
    source: &dyn CostSource,
    notifier: Option<&dyn Notifier>,
) -> Result<Invocation> {
    let period = period::resolve(today);
    info!(
        today = %today,
        start = %period.start,
        end = %period.end,
        source = source.name(),
        "Resolved billing period"
    );

    let total_query = CostQuery::total(period);
    let usage_query = CostQuery::by_usage_type(period);
    let (totals, grouped) = tokio::try_join!(
        source.get_cost_and_usage(&total_query),
        source.get_cost_and_usage(&usage_query),
    )?;

    let total = report::build_total(period, &totals)
        .context("Malformed total cost response")?;
    let items = report::build_line_items(period, &grouped)
        .context("Malformed usage type cost response")?;
    let rendered = report::render(&total, &items);
    info!(
        total = %total.amount,
        line_items = items.len(),
        "Cost report built"
    );

    let delivered = match notifier {
        Some(notifier) => deliver(notifier, &rendered).await,
        None => {
            debug!("No notifier, skipping delivery");
            false
        }
    };

    Ok(Invocation {
        status_code: 200,
        message: "calculation done".to_string(),
        total_billing: total,
        service_billings: items,
        title: rendered.title,
        detail: rendered.detail,
        delivered,
    })
}
