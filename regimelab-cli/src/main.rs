//! RegimeLab CLI: analyse candle files, batch-analyse directories, generate
//! synthetic data.
//!
//! Commands:
//! - `analyze`: indicators, regime and features for one CSV; a full trade
//!   signal when a classifier verdict is supplied
//! - `batch`: every symbol in a data directory, one JSON line per symbol
//! - `synth`: write a deterministic synthetic candle CSV
//!
//! JSON goes to stdout; logs go to stderr (`RUST_LOG`, default `info`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use regimelab_core::{CandleSource, ClassifierVerdict, TradeDirection};
use regimelab_runner::{
    load_analyzer, read_candles, resolve_symbols, write_candles, BatchAnalyzer,
    BatchConfig, SyntheticCandleSource,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "regimelab",
    about = "RegimeLab CLI: market regime, risk and signal analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one candle CSV and print the result as JSON.
    Analyze {
        /// CSV with header timestamp,open,high,low,close,volume.
        #[arg(long)]
        candles: PathBuf,

        /// Symbol name. Defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// Trade direction: STRONG_BUY, BUY, NEUTRAL, SELL, STRONG_SELL.
        #[arg(long, requires_all = ["confidence", "onchain"], conflicts_with = "verdict")]
        direction: Option<TradeDirection>,

        /// Model confidence in [0, 1].
        #[arg(long, requires = "direction")]
        confidence: Option<f64>,

        /// On-chain score in [0, 1].
        #[arg(long, requires = "direction")]
        onchain: Option<f64>,

        /// Kelly fraction in [0, 1]. Estimated from the trade journal when omitted.
        #[arg(long, requires = "direction")]
        kelly: Option<f64>,

        /// JSON file holding one classifier verdict.
        #[arg(long)]
        verdict: Option<PathBuf>,

        /// TOML config with an [analyzer] section.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Analyse every symbol in a data directory, one JSON line per symbol.
    Batch {
        /// Directory of <SYMBOL>.csv files. Overrides the config file.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// JSON map of symbol → verdict. Overrides the config file.
        #[arg(long)]
        verdicts: Option<PathBuf>,

        /// TOML batch config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only these symbols (default: config symbols, else every CSV).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Analyse symbols one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Write a deterministic synthetic candle CSV.
    Synth {
        #[arg(long)]
        symbol: String,

        /// Number of candles.
        #[arg(long)]
        bars: usize,

        /// Mixed with the symbol to seed the walk.
        #[arg(long)]
        seed: Option<u64>,

        /// Candle spacing in milliseconds.
        #[arg(long, default_value_t = 3_600_000)]
        interval_ms: i64,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            candles,
            symbol,
            direction,
            confidence,
            onchain,
            kelly,
            verdict,
            config,
            pretty,
        } => {
            let verdict = match (direction, verdict) {
                (Some(direction), None) => Some(ClassifierVerdict {
                    direction,
                    confidence: confidence.unwrap_or_default(),
                    on_chain_score: onchain.unwrap_or_default(),
                    kelly_fraction: kelly,
                }),
                (None, Some(path)) => Some(load_verdict(&path)?),
                (None, None) => None,
                (Some(_), Some(_)) => bail!("--direction and --verdict are mutually exclusive"),
            };
            run_analyze(&candles, symbol, verdict, config.as_deref(), pretty)
        }
        Commands::Batch {
            data_dir,
            verdicts,
            config,
            symbols,
            sequential,
        } => run_batch(data_dir, verdicts, config.as_deref(), symbols, sequential),
        Commands::Synth {
            symbol,
            bars,
            seed,
            interval_ms,
            out,
        } => run_synth(&symbol, bars, seed, interval_ms, &out),
    }
}

fn load_verdict(path: &Path) -> Result<ClassifierVerdict> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("read verdict {}", path.display()))?;
    Ok(ClassifierVerdict::from_json(&payload)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn format_millis(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

fn run_analyze(
    path: &Path,
    symbol: Option<String>,
    verdict: Option<ClassifierVerdict>,
    config: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let symbol = match symbol {
        Some(s) => s,
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .context("cannot derive a symbol from the candle path; pass --symbol")?,
    };

    let analyzer = load_analyzer(config)?;
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let series = read_candles(&symbol, std::io::BufReader::new(file))?;
    tracing::info!(symbol = %symbol, candles = series.len(), "candles loaded");

    match verdict {
        Some(verdict) => {
            let signal = analyzer.build_signal(&symbol, &series, &verdict)?;
            tracing::info!(
                valid_until = %format_millis(signal.valid_until),
                "signal expiry"
            );
            print_json(&signal, pretty)
        }
        None => print_json(&analyzer.analyze(&series)?, pretty),
    }
}

fn run_batch(
    data_dir: Option<PathBuf>,
    verdicts: Option<PathBuf>,
    config: Option<&Path>,
    symbols: Vec<String>,
    sequential: bool,
) -> Result<()> {
    let mut batch_config = match config {
        Some(path) => BatchConfig::from_file(path)?,
        None => BatchConfig::default(),
    };
    if let Some(dir) = data_dir {
        batch_config.data_dir = dir;
    }
    if verdicts.is_some() {
        batch_config.verdicts = verdicts;
    }
    if !symbols.is_empty() {
        batch_config.symbols = symbols;
    }
    if sequential {
        batch_config.parallel = false;
    }

    let symbols = resolve_symbols(&batch_config)?;
    if symbols.is_empty() {
        bail!(
            "no symbols to analyse in {}",
            batch_config.data_dir.display()
        );
    }

    let batch = BatchAnalyzer::from_config(&batch_config)?;
    let reports = batch.run(&symbols);
    for report in &reports {
        print_json(report, false)?;
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        eprintln!("{failed} of {} symbols failed", reports.len());
        std::process::exit(1);
    }
    Ok(())
}

fn run_synth(symbol: &str, bars: usize, seed: Option<u64>, interval_ms: i64, out: &Path) -> Result<()> {
    let mut source = SyntheticCandleSource::new(bars).with_interval(interval_ms);
    if let Some(seed) = seed {
        source = source.with_seed(seed);
    }
    let series = source.fetch(symbol)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let file = std::fs::File::create(out).with_context(|| format!("create {}", out.display()))?;
    write_candles(&series, file)?;

    tracing::info!(symbol, bars = series.len(), out = %out.display(), "synthetic candles written");
    Ok(())
}
