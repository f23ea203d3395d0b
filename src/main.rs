use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rate_router::display::{display_cycle, display_detection, display_route};
use rate_router::{ArbitrageDetector, Asset, EngineConfig, PoolSnapshot, Router};

#[derive(Parser)]
#[command(name = "rate-router")]
#[command(about = "Best-path routing and arbitrage detection over pool rates", long_about = None)]
struct Cli {
    /// Pool snapshot (JSON)
    #[arg(long, global = true, default_value = "pools.json")]
    pools: PathBuf,

    /// Relaxation tolerance (overrides RATE_ROUTER_EPS)
    #[arg(long, global = true)]
    eps: Option<f64>,

    /// Print results as JSON
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best route between two assets
    Route {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Amount of the input asset
        #[arg(long, default_value = "1.0")]
        amount: f64,
    },

    /// Price a given path (comma separated, e.g. ETH,USDC,DAI)
    Quote {
        #[arg(long, value_delimiter = ',')]
        path: Vec<String>,

        #[arg(long, default_value = "1.0")]
        amount: f64,
    },

    /// Check the snapshot for any arbitrage cycle
    Detect,

    /// Find and print one arbitrage cycle
    Cycle,
}

fn init_tracing(json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_route(cli: &Cli, config: EngineConfig, from: &str, to: &str, amount: f64) -> Result<()> {
    let snapshot = PoolSnapshot::load(&cli.pools)?;
    let (from, to) = (Asset::from(from), Asset::from(to));

    let route = Router::new(config).find_best_path(&snapshot.pools, &from, &to, amount)?;
    info!("Route {} -> {}: {} hops", from, to, route.hop_count());

    if cli.json {
        print_json(&route)
    } else {
        display_route(&route, &from, &to, amount);
        Ok(())
    }
}

fn run_quote(cli: &Cli, config: EngineConfig, path: &[String], amount: f64) -> Result<()> {
    let snapshot = PoolSnapshot::load(&cli.pools)?;
    let path: Vec<Asset> = path.iter().map(|s| Asset::from(s.trim())).collect();

    let quoted = Router::new(config).quote_path(&snapshot.pools, &path, amount)?;

    if cli.json {
        print_json(&quoted)
    } else {
        match (path.first(), path.last()) {
            (Some(from), Some(to)) => display_route(&quoted, from, to, amount),
            _ => println!("  Empty path: nothing to quote."),
        }
        Ok(())
    }
}

fn run_detect(cli: &Cli, config: EngineConfig) -> Result<()> {
    let snapshot = PoolSnapshot::load(&cli.pools)?;
    let found = ArbitrageDetector::new(config).detect(&snapshot.pools, &snapshot.universe())?;
    info!("Arbitrage over {} pools: {}", snapshot.pools.len(), found);

    if cli.json {
        print_json(&serde_json::json!({ "arbitrage": found }))
    } else {
        display_detection(found, snapshot.pools.len());
        Ok(())
    }
}

fn run_cycle(cli: &Cli, config: EngineConfig) -> Result<()> {
    let snapshot = PoolSnapshot::load(&cli.pools)?;
    let cycle = ArbitrageDetector::new(config).find_cycle(&snapshot.pools)?;

    if cli.json {
        print_json(&cycle)
    } else {
        display_cycle(cycle.as_ref());
        Ok(())
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let config = match cli.eps {
        Some(eps) => EngineConfig::new(eps),
        None => EngineConfig::from_env(),
    };
    info!("Relaxation tolerance {:e}", config.eps);

    match &cli.command {
        Commands::Route { from, to, amount } => run_route(&cli, config, from, to, *amount),
        Commands::Quote { path, amount } => run_quote(&cli, config, path, *amount),
        Commands::Detect => run_detect(&cli, config),
        Commands::Cycle => run_cycle(&cli, config),
    }
}
