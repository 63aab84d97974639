//! fairval CLI binary.
//!
//! Provides a command-line interface for managing financial records,
//! computing ratios and estimating fair values.

mod error;
mod settings;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use error::{CliError, Result};
use fairval::data::{RatioCategory, SqliteStore, backup::Backup, csv_io};
use fairval::output::{
    ExportFormat, Exporter, RatioExport, RatioSummary, ReportBuilder, ScreenTable,
    ValuationSummary,
};
use fairval::ratios::{available_ratios, ratios_by_category};
use fairval::valuation::ValuationConfig;
use fairval::{RecordManager, RecordUpdate};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fairval")]
#[command(about = "fairval: financial ratios and fair value estimation", long_about = None)]
#[command(version)]
struct Cli {
    /// Record database (default: platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON file with valuation assumptions
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Table style for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableStyle {
    Ascii,
    Markdown,
}

/// What to export for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportKind {
    /// Annual statements (CSV only)
    Annual,
    /// Price observations (CSV only)
    Prices,
    /// Ratio table
    Ratios,
    /// Valuation estimates
    Valuation,
    /// Sensitivity grid
    Sensitivity,
    /// Full JSON report
    Report,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the bundled sample record
    Seed,

    /// Track a new ticker with a blank three-year template
    Add {
        /// Ticker symbol
        ticker: String,

        /// Company name
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Stop tracking a ticker
    Remove {
        /// Ticker symbol
        ticker: String,
    },

    /// List tracked tickers
    List,

    /// Merge annual statements and/or prices from CSV files
    Import {
        /// Ticker symbol
        ticker: String,

        /// CSV with header `Year,Revenue,Net Profit,Total Assets,Equity,Shares`
        #[arg(long)]
        annual: Option<PathBuf>,

        /// CSV with header `Date,Close,Volume`
        #[arg(long)]
        prices: Option<PathBuf>,
    },

    /// Export a ticker's data or results
    Export {
        /// Ticker symbol
        ticker: String,

        /// What to export
        #[arg(long, value_enum, default_value = "annual")]
        kind: ExportKind,

        /// Output format (csv, json or pretty)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show the ratio table of a ticker
    Ratios {
        /// Ticker symbol
        ticker: String,

        /// Recompute and store the ratio cache first
        #[arg(long)]
        refresh: bool,

        /// Table style
        #[arg(long, value_enum, default_value = "ascii")]
        style: TableStyle,
    },

    /// Estimate the fair value of a ticker
    Valuate {
        /// Ticker symbol
        ticker: String,

        /// Table style
        #[arg(long, value_enum, default_value = "ascii")]
        style: TableStyle,
    },

    /// Value every tracked ticker, sorted by upside
    Screen {
        /// Only show tickers with at least this average upside (percent)
        #[arg(long)]
        min_upside: Option<f64>,

        /// Table style
        #[arg(long, value_enum, default_value = "ascii")]
        style: TableStyle,
    },

    /// Write a JSON backup of every record
    Backup {
        /// Backup file
        path: PathBuf,
    },

    /// Replace every record with a JSON backup
    Restore {
        /// Backup file
        path: PathBuf,
    },

    /// Describe the available ratios
    Info {
        /// Only show one category (profitability, leverage, liquidity, valuation)
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Info does not touch the database
    if let Commands::Info { category } = &cli.command {
        return show_ratio_info(category.as_deref());
    }

    let store = settings::open_store(cli.db.as_deref())?;
    let mut manager = RecordManager::new(store);

    match cli.command {
        Commands::Seed => {
            let record = manager.seed_sample_data()?;
            println!(
                "Seeded {} ({} fiscal years, {} prices)",
                record.ticker,
                record.annual.len(),
                record.prices.len()
            );
        }
        Commands::Add { ticker, name } => {
            if manager.add_ticker(&ticker, &name)? {
                println!("Added {}", ticker.to_uppercase());
            } else {
                println!("{} is already tracked", ticker.to_uppercase());
            }
        }
        Commands::Remove { ticker } => {
            if manager.delete_ticker(&ticker)? {
                println!("Removed {}", ticker.to_uppercase());
            } else {
                println!("{} is not tracked", ticker.to_uppercase());
            }
        }
        Commands::List => list_tickers(&manager)?,
        Commands::Import {
            ticker,
            annual,
            prices,
        } => import(&mut manager, &ticker, annual.as_deref(), prices.as_deref())?,
        Commands::Export {
            ticker,
            kind,
            format,
            output,
        } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let format = format.parse::<ExportFormat>()?;
            export(&manager, &ticker, kind, format, output.as_deref(), &config)?;
        }
        Commands::Ratios {
            ticker,
            refresh,
            style,
        } => {
            let ratios = if refresh {
                manager.refresh_ratios(&ticker)?
            } else {
                manager.ratios(&ticker)?
            };
            let ticker = ticker.to_uppercase();
            let summary = RatioSummary::new(&ticker, &ratios);
            match style {
                TableStyle::Ascii => println!("{}", summary.to_ascii_table()),
                TableStyle::Markdown => println!("{}", summary.to_markdown()),
            }
        }
        Commands::Valuate { ticker, style } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let result = manager.valuate(&ticker, &config)?;
            let summary = ValuationSummary::new(&result);
            match style {
                TableStyle::Ascii => println!("{}", summary.to_ascii_table()),
                TableStyle::Markdown => println!("{}", summary.to_markdown()),
            }
        }
        Commands::Screen { min_upside, style } => {
            let config = settings::load_config(cli.config.as_deref())?;
            let screen = screen(&manager, &config, min_upside)?;
            match style {
                TableStyle::Ascii => println!("{}", screen.to_ascii_table()),
                TableStyle::Markdown => println!("{}", screen.to_markdown()),
            }
        }
        Commands::Backup { path } => {
            let backup = Backup::capture(manager.store())?;
            backup.write_to(&path)?;
            println!(
                "Backed up {} record(s) to {}",
                backup.records.len(),
                path.display()
            );
        }
        Commands::Restore { path } => {
            let backup = Backup::read_from(&path)?;
            let mut store = manager.into_store();
            let restored = backup.restore_into(&mut store)?;
            println!("Restored {} record(s) from {}", restored, path.display());
        }
        Commands::Info { .. } => {}
    }

    Ok(())
}

fn list_tickers(manager: &RecordManager<SqliteStore>) -> Result<()> {
    let tickers = manager.tickers()?;
    if tickers.is_empty() {
        println!("No tickers tracked. Run `fairval seed` to load sample data.");
        return Ok(());
    }

    println!("{:<8} {:<32} {:>6} {:>12}", "Ticker", "Name", "Years", "Last Price");
    println!("{}", "-".repeat(61));
    for ticker in tickers {
        let record = manager.get(&ticker)?;
        let price = record
            .latest_price()
            .map_or_else(|| "N/A".to_string(), |p| format!("{p:.0}"));
        println!(
            "{:<8} {:<32} {:>6} {:>12}",
            record.ticker,
            record.info.name,
            record.annual.len(),
            price
        );
    }

    Ok(())
}

fn import(
    manager: &mut RecordManager<SqliteStore>,
    ticker: &str,
    annual: Option<&Path>,
    prices: Option<&Path>,
) -> Result<()> {
    if annual.is_none() && prices.is_none() {
        return Err(CliError::Usage(
            "nothing to import: pass --annual and/or --prices".to_string(),
        ));
    }

    // Parse both files before writing so a bad file leaves the record untouched
    let mut update = RecordUpdate::new();
    if let Some(path) = annual {
        update.annual = csv_io::parse_annual_csv(File::open(path)?)?;
    }
    if let Some(path) = prices {
        update.prices = csv_io::parse_prices_csv(File::open(path)?)?;
    }

    let (years, observations) = (update.annual.len(), update.prices.len());
    let record = manager.update_record(ticker, update)?;
    info!(ticker = %record.ticker, years, observations, "imported CSV data");
    println!(
        "Imported {} fiscal year(s) and {} price(s) into {}",
        years, observations, record.ticker
    );

    Ok(())
}

fn export(
    manager: &RecordManager<SqliteStore>,
    ticker: &str,
    kind: ExportKind,
    format: ExportFormat,
    output: Option<&Path>,
    config: &ValuationConfig,
) -> Result<()> {
    let record = manager.get(ticker)?;

    let content = match kind {
        ExportKind::Annual => csv_io::export_annual_csv(&record)?,
        ExportKind::Prices => csv_io::export_prices_csv(&record.prices)?,
        ExportKind::Ratios => {
            let ratios = manager.ratios(ticker)?;
            RatioExport::new(&record.ticker, &ratios).export_to_string(format)?
        }
        ExportKind::Valuation => manager.valuate(ticker, config)?.export_to_string(format)?,
        ExportKind::Sensitivity => manager
            .valuate(ticker, config)?
            .sensitivity
            .export_to_string(format)?,
        ExportKind::Report => ReportBuilder::new()
            .ratios(&manager.ratios(ticker)?)?
            .valuation(&manager.valuate(ticker, config)?)?
            .build()
            .to_json()?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}

fn screen(
    manager: &RecordManager<SqliteStore>,
    config: &ValuationConfig,
    min_upside: Option<f64>,
) -> Result<ScreenTable> {
    let tickers = manager.tickers()?;

    let pb = ProgressBar::new(tickers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let mut screen = ScreenTable::new();
    for ticker in &tickers {
        pb.set_message(ticker.clone());
        screen.push(&manager.valuate(ticker, config)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    screen.sort_by_upside();
    if let Some(min_upside) = min_upside {
        screen.retain_min_upside(min_upside);
    }

    Ok(screen)
}

fn show_ratio_info(category: Option<&str>) -> Result<()> {
    let ratios = match category {
        Some(name) => {
            let category = RatioCategory::from_name(name)
                .ok_or_else(|| CliError::UnknownCategory(name.to_string()))?;
            ratios_by_category(category)
        }
        None => available_ratios(),
    };

    println!("{:<18} {:<14} {:<6} Description", "Ratio", "Category", "Price");
    println!("{}", "-".repeat(80));
    for info in ratios {
        println!(
            "{:<18} {:<14} {:<6} {}",
            info.name,
            info.category.name(),
            if info.requires_price { "yes" } else { "no" },
            info.description
        );
        println!("{:<40} needs: {}", "", info.required_fields.join(", "));
    }

    Ok(())
}
