//! # searchable CLI
//!
//! Runs the marketplace pricing logic against listing and selection JSON
//! files. Results go to stdout as pretty JSON, logs go to stderr.
//!
//! ```text
//! searchable total      --listing listing.json --state state.json
//! searchable fees       --amount 45.99 --payment-type balance
//! searchable validate   --amount 0.5 --kind donation
//! searchable selections --listing listing.json --state state.json
//! searchable receipt    --listing listing.json --selections selections.json
//! searchable invoice    --listing listing.json --state state.json
//! ```

mod commands;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use searchable_core::invoice::Buyer;
use searchable_core::{AmountKind, PaymentType};
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "searchable")]
#[command(about = "Totals, fees and checkout payloads for marketplace listings")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Total for a listing and the buyer's choices
    Total {
        #[arg(long)]
        listing: PathBuf,
        /// Selection state (all-in-one listings)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Selections array (downloadable, offline, direct listings)
        #[arg(long)]
        selections: Option<PathBuf>,
    },

    /// Fee breakdown for an amount
    Fees {
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        payment_type: Option<PaymentType>,
    },

    /// Check an amount against payment limits
    Validate {
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "general")]
        kind: AmountKind,
    },

    /// Build invoice selections from an all-in-one selection state
    Selections {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long)]
        state: PathBuf,
    },

    /// Expand selections into receipt lines
    Receipt {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long)]
        selections: PathBuf,
    },

    /// Build a card invoice or balance payment request
    Invoice {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        payment_type: Option<PaymentType>,
        #[arg(long)]
        buyer_address: Option<String>,
        #[arg(long)]
        buyer_tel: Option<String>,
    },
}

fn init_logger(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("searchable_core=debug,searchable=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn run(args: Args, config: &CliConfig) -> anyhow::Result<ExitCode> {
    match args.command {
        Command::Total {
            listing,
            state,
            selections,
        } => {
            let report = commands::total(&listing, state.as_deref(), selections.as_deref(), config)?;
            print_json(&report)?;
        }
        Command::Fees {
            amount,
            payment_type,
        } => {
            let payment_type = payment_type.unwrap_or(config.default_payment_type);
            print_json(&commands::fees(&amount, payment_type)?)?;
        }
        Command::Validate { amount, kind } => {
            let result = commands::validate(&amount, kind);
            print_json(&result)?;
            if !result.is_valid {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Selections { listing, state } => {
            print_json(&commands::selections(&listing, &state)?)?;
        }
        Command::Receipt {
            listing,
            selections,
        } => {
            print_json(&commands::receipt(&listing, &selections, config)?)?;
        }
        Command::Invoice {
            listing,
            state,
            payment_type,
            buyer_address,
            buyer_tel,
        } => {
            let buyer = (buyer_address.is_some() || buyer_tel.is_some()).then(|| Buyer {
                address: buyer_address.unwrap_or_default(),
                tel: buyer_tel.unwrap_or_default(),
            });
            let payment_type = payment_type.unwrap_or(config.default_payment_type);
            print_json(&commands::invoice(&listing, &state, payment_type, buyer, config)?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match CliConfig::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            let e = CliError::from(e);
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    init_logger(args.verbose, &config.log_level);
    debug!(?config, "Configuration loaded");

    match run(args, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
