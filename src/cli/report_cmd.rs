use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::notify::slack::SlackNotifier;
use crate::core::notify::Notifier;
use crate::core::pipeline;
use crate::core::sources::cost_explorer::AwsCostExplorer;

pub struct ReportArgs {
    pub date: Option<NaiveDate>,
    pub dry_run: bool,
    pub region: Option<String>,
    pub webhook_url: Option<String>,
}

/// Parse `--date` values (YYYY-MM-DD).
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", value, e))
}

pub async fn run(config: AppConfig, args: ReportArgs, opts: &OutputOptions) -> Result<()> {
    let config = config.with_overrides(args.webhook_url, args.region);
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());

    let notifier: Option<SlackNotifier> = if args.dry_run {
        info!("Dry run, the report will not be delivered");
        None
    } else {
        match config.notifier.endpoint_url.clone() {
            Some(url) => Some(SlackNotifier::new(url).context("Invalid webhook URL")?),
            None => {
                warn!("No webhook URL set (SLACK_WEBHOOK_URL or notifier.endpoint_url)");
                None
            }
        }
    };

    let source = AwsCostExplorer::with_region(&config.cost_explorer.region).await;
    let invocation = pipeline::run_once(
        today,
        &source,
        notifier.as_ref().map(|n| n as &dyn Notifier),
    )
    .await
    .context("Failed to build cost report")?;

    match opts.format {
        OutputFormat::Text => {
            println!(
                "{}",
                renderer::render_invocation(&invocation, args.dry_run, opts.use_color)
            );
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&invocation)?
            } else {
                serde_json::to_string(&invocation)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
