//! ccusage - Summarize Claude Code token usage from local JSONL logs

use ccusage::{
    cli::{Cli, Command},
    output::get_formatter,
};
use ccusage_core::aggregation_types::Totals;
use ccusage_core::error::Result;
use ccusage_provider_claude::{load_daily_usage, load_session_usage};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const NO_DATA_MESSAGE: &str = "No Claude usage data found.";

/// Log filter used for `--verbose` when RUST_LOG is unset
const VERBOSE_FILTER: &str = "warn,ccusage=info,ccusage_core=info,ccusage_provider_claude=info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose raises our own crates to info.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            tracing_subscriber::EnvFilter::new(VERBOSE_FILTER)
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let timezone_config = cli.timezone_config()?;
    info!("Using timezone: {}", timezone_config.display_name());

    let options = cli.load_options();
    let formatter = get_formatter(cli.json);

    match cli.report() {
        Command::Daily => {
            info!("Running daily usage report");
            let daily = load_daily_usage(&options, &timezone_config).await?;
            if daily.is_empty() {
                report_empty(cli.json);
                return Ok(());
            }
            let totals = Totals::from_daily(&daily);
            println!("{}", formatter.format_daily(&daily, &totals)?);
        }
        Command::Session => {
            info!("Running session usage report");
            let sessions = load_session_usage(&options, &timezone_config).await?;
            if sessions.is_empty() {
                report_empty(cli.json);
                return Ok(());
            }
            let totals = Totals::from_sessions(&sessions);
            println!("{}", formatter.format_sessions(&sessions, &totals)?);
        }
    }

    Ok(())
}

/// An empty report is not an error: JSON callers get `[]`, humans a warning
fn report_empty(json: bool) {
    if json {
        println!("[]");
    } else {
        warn!("{NO_DATA_MESSAGE}");
    }
}
