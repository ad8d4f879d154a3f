mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::needs::{InsuredIncomeArgs, NeedsArgs, WantArgs};
use commands::series::SeriesArgs;
use commands::tax::{BracketArgs, TaxBurdenArgs};
use commands::valuation::ValueArgs;

/// Estate projection and insurable-needs calculations
#[derive(Parser)]
#[command(
    name = "estate-needs",
    version,
    about = "Estate projection and insurable-needs calculations",
    long_about = "A CLI for projecting a client's assets and businesses through time and \
                  sizing the insurance behind income replacement, deemed-disposition tax, \
                  beneficiary equalization, debt and goal shortfalls. All amounts use \
                  decimal precision; tax brackets are supplied as configuration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics (debug level) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full insurable-needs report with need and want per purpose
    Needs(NeedsArgs),
    /// Year-by-year net worth, diversification, tax and business series
    Series(SeriesArgs),
    /// Value one asset or business at a given year
    Value(ValueArgs),
    /// Capital gains tax owed if everything were disposed of at a year
    TaxBurden(TaxBurdenArgs),
    /// Look up the marginal bracket for an amount
    Bracket(BracketArgs),
    /// Age-banded income replacement coverage
    InsuredIncome(InsuredIncomeArgs),
    /// Scale a need by the client's priority
    Want(WantArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let _logger = match logging::init_logging(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("{}: {}", "warning".yellow().bold(), e);
            None
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Needs(args) => commands::needs::run_needs(args),
        Commands::Series(args) => commands::series::run_series(args),
        Commands::Value(args) => commands::valuation::run_value(args),
        Commands::TaxBurden(args) => commands::tax::run_tax_burden(args),
        Commands::Bracket(args) => commands::tax::run_bracket(args),
        Commands::InsuredIncome(args) => commands::needs::run_insured_income(args),
        Commands::Want(args) => commands::needs::run_want(args),
        Commands::Version => {
            println!("estate-needs {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
