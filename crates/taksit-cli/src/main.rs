mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{AmortizeArgs, PlanArgs};
use commands::numeric::{FactorialArgs, SelectionArgs};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "TAKSIT_LOG";

/// Loan amortization schedules and calculator helpers
#[derive(Parser)]
#[command(
    name = "taksit",
    version,
    about = "Loan amortization schedules and calculator helpers",
    long_about = "Computes level-payment loan schedules with decimal precision. \
                  Accepts per-period terms or calculator-style inputs (percent rates, \
                  annual or periodic basis, KKDF/BSMV levies, due dates), plus \
                  factorial, permutation and combination helpers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Render amounts in Turkish locale (table output)
    #[arg(long, global = true)]
    tr: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortization schedule from per-period terms
    Amortize(AmortizeArgs),
    /// Loan plan from calculator-style inputs
    Plan(PlanArgs),
    /// n!
    Factorial(FactorialArgs),
    /// Ordered selections P(n, k)
    Permutation(SelectionArgs),
    /// Unordered selections C(n, k)
    Combination(SelectionArgs),
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

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Plan(args) => commands::amortization::run_plan(args),
        Commands::Factorial(args) => commands::numeric::run_factorial(args),
        Commands::Permutation(args) => commands::numeric::run_permutation(args),
        Commands::Combination(args) => commands::numeric::run_combination(args),
        Commands::Version => {
            println!("taksit {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, cli.tr, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
