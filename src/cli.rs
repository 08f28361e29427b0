//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::cached_adapter::CachedQuotePort;
use crate::adapters::csv_adapter::CsvQuoteAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::{
    DEFAULT_ASSET, DEFAULT_FX, DEFAULT_HISTORY_YEARS, DEFAULT_MONTHLY_AMOUNT,
    DEFAULT_SCHEDULE_DAY, DcaConfig,
};
use crate::domain::config_validation::{
    check_history_years, check_monthly_amount, check_schedule_day, validate_config,
};
use crate::domain::error::DcaError;
use crate::domain::ledger::{self, Ledger};
use crate::domain::normalizer::normalize;
use crate::domain::price_series::PriceSeries;
use crate::domain::schedule::MAX_SCHEDULE_DAY;
use crate::domain::summary::PortfolioSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::QuotePort;
use crate::ports::report_port::LedgerExportPort;

#[derive(Parser, Debug)]
#[command(name = "dcasim", about = "Monthly dollar-cost-averaging simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Years of history to simulate
    #[arg(long)]
    pub years: Option<u32>,
    /// Day of month to buy on (1-28)
    #[arg(long)]
    pub day: Option<u32>,
    /// Amount invested each month, in home currency
    #[arg(long)]
    pub amount: Option<f64>,
    /// Directory holding <symbol>.csv quote files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Simulate as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation and print the summary
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        /// Write the ledger as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print every monthly purchase
        #[arg(long)]
        table: bool,
    },
    /// Compare outcomes for every schedule day
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Show available data range for the configured symbols
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Installs the stderr log subscriber. `RUST_LOG` filters (default `info`);
/// `DCASIM_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("DCASIM_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            config,
            overrides,
            output,
            table,
        } => run_simulate(&config, &overrides, output.as_deref(), table),
        Command::Sweep { config, overrides } => run_sweep(&config, &overrides),
        Command::Validate { config, overrides } => run_validate(&config, &overrides),
        Command::Info { config, data_dir } => run_info(&config, data_dir.as_deref()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DcaError> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_dca_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<DcaConfig, DcaError> {
    let history_years = match overrides.years {
        Some(y) => i64::from(y),
        None => adapter.get_int("dca", "history_years", DEFAULT_HISTORY_YEARS),
    };
    let schedule_day = match overrides.day {
        Some(d) => i64::from(d),
        None => adapter.get_int("dca", "schedule_day", DEFAULT_SCHEDULE_DAY),
    };
    let monthly_amount = overrides
        .amount
        .unwrap_or_else(|| adapter.get_double("dca", "monthly_amount", DEFAULT_MONTHLY_AMOUNT));

    check_history_years(history_years)?;
    check_schedule_day(schedule_day)?;
    check_monthly_amount(monthly_amount)?;

    Ok(DcaConfig {
        history_years: history_years as u32,
        schedule_day: schedule_day as u32,
        monthly_amount,
        asset: adapter.get_string_or("data", "asset", DEFAULT_ASSET),
        fx: adapter.get_string_or("data", "fx", DEFAULT_FX),
    })
}

pub fn resolve_data_dir(
    adapter: &dyn ConfigPort,
    data_dir_override: Option<&Path>,
) -> Result<PathBuf, DcaError> {
    if let Some(dir) = data_dir_override {
        return Ok(dir.to_path_buf());
    }
    match adapter.get_string("data", "path") {
        Some(p) if !p.trim().is_empty() => Ok(PathBuf::from(p.trim())),
        _ => Err(DcaError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        }),
    }
}

pub fn resolve_output(adapter: &dyn ConfigPort, output_override: Option<&Path>) -> Option<PathBuf> {
    output_override.map(Path::to_path_buf).or_else(|| {
        adapter
            .get_string("output", "csv")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Everything one simulation run produces.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub series: PriceSeries,
    pub ledger: Ledger,
    pub summary: PortfolioSummary,
}

/// Fetch both raw series, normalize, then simulate. A normalization failure
/// returns before any ledger is built.
pub fn run_pipeline(
    port: &dyn QuotePort,
    config: &DcaConfig,
    as_of: NaiveDate,
) -> Result<SimulationRun, DcaError> {
    let (start, end) = config.window(as_of);
    tracing::info!(asset = %config.asset, fx = %config.fx, %start, %end, "fetching quotes");

    let asset = port.fetch_quotes(&config.asset, start, end)?;
    let fx = port.fetch_quotes(&config.fx, start, end)?;
    let series = normalize(&asset, &fx, start, end)?;

    let ledger = ledger::simulate(&series, config.schedule_day, config.monthly_amount);
    let summary = PortfolioSummary::compute(&ledger, &series);

    Ok(SimulationRun {
        start,
        end,
        series,
        ledger,
        summary,
    })
}

fn run_simulate(
    config_path: &Path,
    overrides: &Overrides,
    output_override: Option<&Path>,
    table: bool,
) -> Result<(), DcaError> {
    let adapter = load_config(config_path)?;
    let config = build_dca_config(&adapter, overrides)?;
    let data_dir = resolve_data_dir(&adapter, overrides.data_dir.as_deref())?;
    let as_of = overrides.as_of.unwrap_or_else(today);

    let port = CsvQuoteAdapter::new(data_dir);
    let sim = run_pipeline(&port, &config, as_of)?;

    print_summary(&config, &sim);
    if table {
        print_ledger(&sim.ledger);
    }

    if let Some(path) = resolve_output(&adapter, output_override) {
        let exporter = CsvLedgerAdapter::new(adapter.get_bool("output", "bom", true));
        exporter.write(&sim.ledger, &path)?;
        eprintln!("Ledger written to: {}", path.display());
    }
    Ok(())
}

fn run_sweep(config_path: &Path, overrides: &Overrides) -> Result<(), DcaError> {
    let adapter = load_config(config_path)?;
    let base = build_dca_config(&adapter, overrides)?;
    let data_dir = resolve_data_dir(&adapter, overrides.data_dir.as_deref())?;
    let as_of = overrides.as_of.unwrap_or_else(today);

    let port = CachedQuotePort::new(CsvQuoteAdapter::new(data_dir));
    let rows = sweep_schedule_days(&port, &base, as_of)?;

    println!(
        "{:>3}  {:>10}  {:>16}  {:>16}  {:>9}",
        "day", "purchases", "contributed", "value", "roi %"
    );
    for (day, sim) in &rows {
        println!(
            "{:>3}  {:>10}  {:>16.2}  {:>16.2}  {:>9.2}",
            day,
            sim.ledger.len(),
            sim.summary.total_contributed,
            sim.summary.current_value,
            sim.summary.current_roi_percent,
        );
    }
    Ok(())
}

/// Runs the pipeline once per schedule day. Quotes are fetched once.
pub fn sweep_schedule_days<P: QuotePort>(
    port: &CachedQuotePort<P>,
    base: &DcaConfig,
    as_of: NaiveDate,
) -> Result<Vec<(u32, SimulationRun)>, DcaError> {
    (1..=MAX_SCHEDULE_DAY)
        .map(|day| {
            let config = DcaConfig {
                schedule_day: day,
                ..base.clone()
            };
            run_pipeline(port, &config, as_of).map(|sim| (day, sim))
        })
        .collect()
}

fn run_validate(config_path: &Path, overrides: &Overrides) -> Result<(), DcaError> {
    let adapter = load_config(config_path)?;
    let config = build_dca_config(&adapter, overrides)?;
    let data_dir = resolve_data_dir(&adapter, overrides.data_dir.as_deref())?;
    let as_of = overrides.as_of.unwrap_or_else(today);
    let (start, end) = config.window(as_of);

    println!("Asset:          {}", config.asset);
    println!("Exchange rate:  {}", config.fx);
    println!("Data directory: {}", data_dir.display());
    println!("History:        {} years ({} to {}, exclusive)", config.history_years, start, end);
    println!("Schedule day:   {}", config.schedule_day);
    println!("Monthly amount: {:.2}", config.monthly_amount);
    if let Some(out) = resolve_output(&adapter, None) {
        println!("Export:         {}", out.display());
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, data_dir_override: Option<&Path>) -> Result<(), DcaError> {
    let adapter = load_config(config_path)?;
    let data_dir = resolve_data_dir(&adapter, data_dir_override)?;
    let port = CsvQuoteAdapter::new(data_dir);

    for symbol in [
        adapter.get_string_or("data", "asset", DEFAULT_ASSET),
        adapter.get_string_or("data", "fx", DEFAULT_FX),
    ] {
        match port.data_range(&symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} rows, {} to {}", symbol, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", symbol),
            Err(e) => eprintln!("error querying {}: {}", symbol, e),
        }
    }
    Ok(())
}

fn print_summary(config: &DcaConfig, sim: &SimulationRun) {
    let s = &sim.summary;
    println!("=== DCA {} in {} ===", config.asset, config.fx);
    println!("Window:            {} to {}", sim.start, sim.end);
    println!("Purchases:         {}", sim.ledger.len());
    println!("Total contributed: {:.2}", s.total_contributed);
    println!("Current value:     {:.2}", s.current_value);
    println!("P&L:               {:.2} ({:.2}%)", s.current_pnl, s.current_roi_percent);
    println!("Units held:        {:.8}", s.current_units);
    match s.average_cost {
        Some(avg) => println!("Average cost:      {:.2}", avg),
        None => println!("Average cost:      -"),
    }
    println!("Last price:        {:.2} on {}", s.last_price, s.as_of);
}

fn print_ledger(ledger: &Ledger) {
    println!(
        "\n{:<10}  {:>14}  {:>10}  {:>12}  {:>14}  {:>14}  {:>14}  {:>14}  {:>8}",
        "date", "price", "amount", "bought", "units", "contributed", "value", "pnl", "roi %"
    );
    for e in ledger {
        println!(
            "{:<10}  {:>14.2}  {:>10.2}  {:>12.8}  {:>14.8}  {:>14.2}  {:>14.2}  {:>14.2}  {:>8.2}",
            e.date.to_string(),
            e.price,
            e.contribution,
            e.units_bought,
            e.cumulative_units,
            e.cumulative_contributed,
            e.market_value,
            e.pnl,
            e.roi_percent,
        );
    }
}
