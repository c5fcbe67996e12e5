// Copyright (c) 2026 CampusCoin Maintainers. MIT License.
// See LICENSE for details.

//! # CampusCoin Node
//!
//! Entry point for the `campus-node` binary. Parses CLI arguments,
//! initializes logging, and dispatches to a subcommand:
//!
//! - `init`    — write a genesis file
//! - `replay`  — deploy from a genesis file and execute a call script
//! - `version` — print build version information

mod cli;
mod genesis;
mod logging;
mod metrics;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use campus_contracts::SharedLedger;
use campus_protocol::{Address, Amount, LedgerConfig};

use cli::{CampusNodeCli, Commands};
use genesis::GenesisFile;
use logging::LogFormat;
use metrics::ReplayMetrics;

fn main() -> Result<()> {
    let cli = CampusNodeCli::parse();
    logging::init_logging(
        logging::DEFAULT_FILTER,
        LogFormat::from_str_lossy(&cli.log_format),
    )?;

    match cli.command {
        Commands::Init(args) => init_genesis(args),
        Commands::Replay(args) => run_replay(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Writes a genesis file from CLI arguments.
fn init_genesis(args: cli::InitArgs) -> Result<()> {
    let mut config = LedgerConfig::default();
    if let Some(supply) = &args.genesis_supply {
        config.genesis_supply = Amount::parse_tokens(supply)
            .with_context(|| format!("invalid --genesis-supply {:?}", supply))?;
    }
    if let Some(fee_bps) = args.fee_bps {
        config.service_fee_bps = fee_bps;
    }
    config.validate()?;

    let genesis = GenesisFile {
        admin: Address::resolve(&args.admin).context("invalid --admin")?,
        university: Address::resolve(&args.university).context("invalid --university")?,
        config,
    };
    genesis.save(&args.output, args.force)?;

    tracing::info!(
        path = %args.output.display(),
        admin = %genesis.admin,
        university = %genesis.university,
        "genesis file written"
    );

    println!("Genesis written to {}", args.output.display());
    println!("  Admin          : {}", genesis.admin);
    println!("  University     : {}", genesis.university);
    println!("  Genesis supply : {} CC", genesis.config.genesis_supply);
    println!("  Service fee    : {} bps", genesis.config.service_fee_bps);
    Ok(())
}

/// Deploys from the genesis file and replays the script, printing one JSON
/// line per step followed by the summary.
fn run_replay(args: cli::ReplayArgs) -> Result<()> {
    let genesis = GenesisFile::load(&args.genesis)?;
    let steps = replay::load_script(&args.script)?;
    let ledger = SharedLedger::new(genesis.deploy()?);
    let metrics = ReplayMetrics::new().context("failed to register metrics")?;

    tracing::info!(
        genesis = %args.genesis.display(),
        script = %args.script.display(),
        steps = steps.len(),
        service_fee_bps = ledger.read(|coin| coin.config().service_fee_bps),
        "starting replay"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = replay::replay(&ledger, &steps, &metrics, args.fail_fast, &mut out)?;
    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;
    out.flush()?;

    if args.metrics {
        eprint!("{}", metrics.encode()?);
    }

    tracing::info!(
        committed = summary.committed,
        rejected = summary.rejected,
        diverged = summary.diverged.len(),
        total_supply = %ledger.total_supply(),
        "replay finished"
    );

    summary.ensure_clean()
}

/// Prints version information to stdout.
fn print_version() {
    println!("campus-node {}", env!("CARGO_PKG_VERSION"));
    println!("ledger      {}", campus_protocol::config::LEDGER_VERSION);
    println!(
        "token       {} ({}, {} decimals)",
        campus_protocol::config::TOKEN_NAME,
        campus_protocol::config::TOKEN_SYMBOL,
        campus_protocol::config::DECIMALS
    );
}
