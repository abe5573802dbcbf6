use colored::{control, Colorize};

use crate::core::formatter::round_usd;
use crate::core::models::cost::Invocation;

/// Render an invocation for the terminal.
///
/// Layout:
/// ```text
///  06/01～06/14の請求額は、123.46 USDです。
///   - S3/DataTransfer: 5.56 USD (10.0 GB)
///
///   Period    2023-06-01 .. 2023-06-15 (exclusive)
///   Items     1 of 2 shown
///   Delivery  sent
/// ```
pub fn render_invocation(invocation: &Invocation, dry_run: bool, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(" {}", invocation.title).bold().to_string());

    if invocation.detail.is_empty() {
        lines.push(format!("  {}", "No billed line items".dimmed()));
    } else {
        for line in invocation.detail.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines.push(String::new());

    let period = &invocation.total_billing.period;
    lines.push(format!(
        "  {}    {} .. {} (exclusive)",
        "Period".cyan(),
        period.start,
        period.end
    ));

    let shown = invocation
        .service_billings
        .iter()
        .filter(|item| !round_usd(item.amount).is_zero())
        .count();
    lines.push(format!(
        "  {}     {} of {} shown",
        "Items".cyan(),
        shown,
        invocation.service_billings.len()
    ));

    let delivery = if dry_run {
        "skipped (dry run)".dimmed()
    } else if invocation.delivered {
        "sent".green()
    } else {
        "not sent".yellow()
    };
    lines.push(format!("  {}  {}", "Delivery".cyan(), delivery));

    lines.join("\n")
}
