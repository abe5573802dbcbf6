mod cli;
mod core;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "billing-notifier",
    about = "Post the month-to-date AWS bill to Slack",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cost report and deliver it
    Report {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long, value_parser = cli::report_cmd::parse_date)]
        date: Option<NaiveDate>,

        /// Build and print the report without delivering it
        #[arg(long)]
        dry_run: bool,

        /// Cost Explorer region
        #[arg(long)]
        region: Option<String>,

        /// Slack incoming-webhook URL
        #[arg(long)]
        webhook_url: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("billing_notifier=debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("billing_notifier=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        None | Some(Commands::Report { .. }) => {
            let args = match cli.command {
                Some(Commands::Report {
                    date,
                    dry_run,
                    region,
                    webhook_url,
                }) => cli::report_cmd::ReportArgs {
                    date,
                    dry_run,
                    region,
                    webhook_url,
                },
                _ => cli::report_cmd::ReportArgs {
                    date: None,
                    dry_run: false,
                    region: None,
                    webhook_url: None,
                },
            };

            let config = AppConfig::load()
                .context("Failed to load config")?
                .with_env_overrides();
            let output_opts = cli::output::OutputOptions {
                format: cli::output::OutputFormat::resolve(
                    cli.json,
                    cli.format.as_deref(),
                    &config.settings.default_format,
                ),
                pretty: cli.pretty,
                use_color: cli::output::detect_color(!cli.no_color, &config.settings.color),
            };
            cli::report_cmd::run(config, args, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check()?,
        },
    }

    Ok(())
}
