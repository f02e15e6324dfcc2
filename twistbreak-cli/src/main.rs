//! TwistBreak CLI — replay CSV minute bars through the signal engine.
//!
//! Commands:
//! - `replay` — feed a CSV bar file through the engine and report the
//!   twists, trades, and exits it produced
//! - `default-config` — print the default strategy parameters as TOML

mod feed;
mod replay;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twistbreak_core::{TwistBreakConfig, TwistBreakEngine};

#[derive(Parser)]
#[command(
    name = "twistbreak",
    about = "TwistBreak CLI — triple moving-average twist/break signal replay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV bar file (timestamp,close[,volume]) through the engine.
    Replay {
        /// Path to the bar CSV file.
        #[arg(long)]
        bars: PathBuf,

        /// Strategy parameters as a TOML file. Defaults to the built-in
        /// parameters when omitted; a partial file overrides only the
        /// fields it names.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only replay the first N bars.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the default strategy parameters as TOML.
    DefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<TwistBreakConfig> {
    match path {
        None => Ok(TwistBreakConfig::default()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config: TwistBreakConfig =
                toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
            Ok(config)
        }
    }
}

fn cmd_replay(bars_path: &PathBuf, config_path: Option<&PathBuf>, limit: Option<usize>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut engine = TwistBreakEngine::new(config).context("invalid strategy configuration")?;

    let mut bars = feed::read_bars(bars_path)
        .with_context(|| format!("loading bars from {}", bars_path.display()))?;
    if let Some(limit) = limit {
        bars.truncate(limit);
    }

    let summary = replay::replay(&mut engine, &bars);

    println!("bars:          {}", summary.bars);
    println!("skipped:       {}", summary.skipped_bars);
    println!("twists:        {}", summary.twists);
    println!(
        "trades:        {} ({} closed)",
        summary.trades.len(),
        summary.closed_trades()
    );
    for trade in &summary.trades {
        match (trade.exit_time, trade.exit_price, trade.stats) {
            (Some(exit_time), Some(exit_price), Some(stats)) => println!(
                "  {:?} {} @ {:.4} -> {} @ {:.4} \
                 (return {:+.4}, high-water {:.4}, max drawdown {:.4})",
                trade.direction,
                trade.entry_time,
                trade.entry_price,
                exit_time,
                exit_price,
                stats.cumulative_return,
                stats.high_water,
                stats.max_drawdown,
            ),
            _ => println!(
                "  {:?} {} @ {:.4} (still open)",
                trade.direction, trade.entry_time, trade.entry_price
            ),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            bars,
            config,
            limit,
        } => cmd_replay(&bars, config.as_ref(), limit),
        Commands::DefaultConfig => {
            let toml = toml::to_string_pretty(&TwistBreakConfig::default())?;
            print!("{toml}");
            Ok(())
        }
    }
}
