use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use std::thread::sleep;
use std::time::Duration;
use storeboard_api::StoreboardClient;
use storeboard_reporting::{ChartFeed, SalesSeries, SeriesReport, SeriesRequest};
use storeboard_shared_models::{MetricType, ReportPeriod, WeekStart};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "salesboard=info,storeboard_reporting=info,storeboard_api=warn";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chart period: daily, weekly or monthly
    #[arg(long, default_value = "daily")]
    period: ReportPeriod,

    /// Plotted metric: revenue or orders
    #[arg(long, default_value = "revenue")]
    metric: MetricType,

    /// First day of a weekly bucket: sunday or monday
    #[arg(long, default_value = "sunday")]
    week_start: WeekStart,

    /// Overrides STOREBOARD_API_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Print the series as JSON
    #[arg(long)]
    json: bool,

    /// Refresh every N seconds until interrupted
    #[arg(long)]
    watch: Option<u64>,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &SeriesReport, args: &Args) -> anyhow::Result<()> {
    if args.json {
        let json = render::render_json(report, args.metric).context("Failed to encode series")?;
        println!("{json}");
    } else {
        print!("{}", render::render_table(report, args.metric));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = AppConfig::from_env(args.base_url.clone()).context("Failed to load configuration")?;
    let client =
        StoreboardClient::new(&config.client_config()).context("Failed to build API client")?;
    info!(base_url = client.base_url(), period = %args.period, metric = %args.metric, "salesboard starting");

    let feed = ChartFeed::new(SalesSeries::new(client, config.reporting_config(args.week_start)));
    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    loop {
        let request = SeriesRequest::lookback(args.period, Utc::now());
        if let Some(report) = rt.block_on(feed.refresh(request)) {
            if let Err(e) = print_report(&report, &args) {
                error!("Error printing sales series: {e:#}");
            }
        }

        match args.watch {
            Some(secs) => sleep(Duration::from_secs(secs.max(1))),
            None => break,
        }
    }

    Ok(())
}
