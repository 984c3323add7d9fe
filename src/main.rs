use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use nba_reference_db::config::{ApiCredentials, DbCredentials, RunConfig};
use nba_reference_db::fetch::{Fetcher, HttpTransport};
use nba_reference_db::rate_limit::{RateLimiter, RateLimiterConfig};
use nba_reference_db::sink::{PgSink, PrintSink};
use nba_reference_db::{run, Extractor, PipelineError, RunSummary};

#[derive(Parser)]
#[command(name = "nba-reference-db")]
#[command(about = "Load NBA teams, games, players and player statistics into Postgres")]
struct Cli {
    /// First season to extract
    #[arg(long, default_value = "2015")]
    start_season: u16,

    /// Last season to extract (inclusive)
    #[arg(long, default_value = "2024")]
    end_season: u16,

    /// API calls allowed per rate-limit window
    #[arg(long, default_value = "10")]
    quota: u32,

    /// Rate-limit window length in seconds
    #[arg(long, default_value = "60")]
    window_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Extra exhibition opponent to skip, as SEASON:TEAM_ID (repeatable)
    #[arg(long = "exclude-visitor", value_name = "SEASON:TEAM_ID")]
    exclude_visitor: Vec<String>,

    /// Print the assembled tables instead of loading them
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nba_reference_db=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(summary) => {
            print_summary(&cli, &summary);
            Ok(())
        }
        Err(e) => {
            error!("Run failed, nothing was loaded: {e}");
            Err(e.into())
        }
    }
}

async fn execute(cli: &Cli) -> Result<RunSummary, PipelineError> {
    // All credentials are checked before the first request goes out.
    let api = ApiCredentials::from_env()?;
    let db = if cli.dry_run {
        None
    } else {
        Some(DbCredentials::from_env()?)
    };

    let rate_limit = RateLimiterConfig {
        quota: cli.quota,
        window: Duration::from_secs(cli.window_secs),
    };
    let mut config = RunConfig::new(cli.start_season, cli.end_season, rate_limit)?;
    for entry in &cli.exclude_visitor {
        config.exhibitions.add_entry(entry)?;
    }

    info!("🏀 NBA Reference Data Loader");
    info!("API host: {}", api.host);
    info!("Seasons: {} to {}", cli.start_season, cli.end_season);
    info!("Rate limit: {} calls per {}s", cli.quota, cli.window_secs);

    let transport = HttpTransport::new(&api.host, &api.key, Duration::from_secs(cli.timeout_secs))?;
    let fetcher = Fetcher::new(transport, RateLimiter::new(rate_limit)?);
    let mut extractor = Extractor::new(fetcher, config);

    match db {
        None => {
            let mut sink = PrintSink::new(std::io::stdout(), 5);
            run(&mut extractor, &mut sink).await
        }
        Some(db) => {
            let mut sink = PgSink::connect(&db).await?;
            let summary = run(&mut extractor, &mut sink).await;
            sink.close().await;
            summary
        }
    }
}

fn print_summary(cli: &Cli, summary: &RunSummary) {
    println!("\n📊 Load Summary:");
    println!("   API requests: {}", summary.requests);
    for (table, rows) in &summary.loaded {
        println!("   {table}: {rows} rows");
    }
    for report in &summary.reports {
        println!("   {report}");
    }
    if cli.dry_run {
        println!("   Dry run: nothing was written to the database");
    } else {
        println!("✅ Tables loaded");
    }
}
