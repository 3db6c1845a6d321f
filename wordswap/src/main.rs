// wordswap/src/main.rs
//! Wordswap entry point.
//!
//! Loads `.env`, parses the command line, sets up logging and dispatches to
//! the chosen subcommand. Failures are reported on stderr with a non-zero
//! exit status.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

use wordswap::cli::{Cli, Commands};
use wordswap::commands::{apply, error_msg, rules, switch};
use wordswap::logger;
use wordswap::utils::store_path::resolve_store_path;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let store_path = resolve_store_path(args.store)?;
    log::debug!("Using rule store at {}", store_path.display());

    match args.command {
        Commands::Apply(cmd) => {
            let opts = apply::ApplyOptions::from_command(&cmd, args.quiet)?;
            apply::run_apply(opts, &store_path).await?;
        }
        Commands::Rules(cmd) => rules::run_rules(cmd, &store_path, args.quiet).await?,
        Commands::Switch { state } => switch::run_switch(state, &store_path, args.quiet).await?,
    }

    Ok(())
}
