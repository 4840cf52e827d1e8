use clap::Parser;
use rsibot::api::{BinanceClient, MarketDataSource, OrderVenue, PaperVenue};
use rsibot::config::BotConfig;
use rsibot::ControlLoop;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// RSI trading bot: one symbol, market orders, fixed polling interval
#[derive(Debug, Parser)]
#[command(name = "rsibot", version, about)]
struct Args {
    /// Config file (toml, json, yaml...). Defaults to ./config.* if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Paper-trade: fetch real candles but never send orders
    #[arg(long)]
    dry_run: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();

    tracing::info!("🚀 rsibot starting");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Cannot start: {}", e);
            return Err(e);
        }
    };
    config.log_summary();

    let credentials = config.credentials()?;
    let client = BinanceClient::new(config.base_url.clone(), credentials)?;

    if config.dry_run {
        run(&config, client, PaperVenue::new(), args.once).await
    } else {
        run(&config, client.clone(), client, args.once).await
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rsibot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &Args) -> anyhow::Result<BotConfig> {
    let mut config = BotConfig::load(args.config.as_deref())?;
    if args.dry_run {
        config.dry_run = true;
    }
    config.validate()?;
    // Fail before the loop starts rather than on the first order
    config.credentials()?;
    Ok(config)
}

async fn run<S: MarketDataSource, V: OrderVenue>(
    config: &BotConfig,
    source: S,
    venue: V,
    once: bool,
) -> anyhow::Result<()> {
    let mut control_loop = ControlLoop::from_config(config, source, venue);

    if once {
        if let Some(Err(e)) = control_loop.run_cycles(1).await.pop() {
            return Err(e.into());
        }
    } else {
        control_loop.run().await;
    }

    Ok(())
}
