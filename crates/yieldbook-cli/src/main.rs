mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::investment::{EmiArgs, InvestmentArgs};
use commands::portfolio::{HoldingsArgs, NotificationsArgs, PortfolioArgs};

/// Property investment and portfolio dashboard calculations
#[derive(Parser)]
#[command(
    name = "yieldbook",
    version,
    about = "Property investment and portfolio dashboard calculations",
    long_about = "A CLI for property investment analysis with decimal precision. \
                  Computes financing, itemised upfront and monthly costs, cash flow \
                  and yield metrics for a unit, and summarises a holdings feed."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a property investment (financing, costs, cash flow, ROI)
    Investment(InvestmentArgs),
    /// Monthly installment of a fixed-rate loan
    Emi(EmiArgs),
    /// Summarise a holdings feed (totals, P&L, cash, allocation)
    Portfolio(PortfolioArgs),
    /// Print the holdings feed as a sorted table
    Holdings(HoldingsArgs),
    /// Classify and order a notifications feed, newest first
    Notifications(NotificationsArgs),
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

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Investment(args) => commands::investment::run_investment(args),
        Commands::Emi(args) => commands::investment::run_emi(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Holdings(args) => commands::portfolio::run_holdings(args),
        Commands::Notifications(args) => commands::portfolio::run_notifications(args),
        Commands::Version => {
            println!("yieldbook {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
