//! The `switch` command: reads or flips the master switch.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Write};
use std::path::Path;

use wordswap_core::FileStore;

use super::success_msg;
use crate::cli::SwitchState;

pub async fn run_switch(state: SwitchState, store_path: &Path, quiet: bool) -> Result<()> {
    let store = FileStore::open(store_path)
        .await
        .with_context(|| format!("Failed to open rule store {}", store_path.display()))?;

    let enabled = match state {
        SwitchState::Status => {
            let label = if store.store().enabled().await { "on" } else { "off" };
            writeln!(io::stdout().lock(), "{}", label)?;
            return Ok(());
        }
        SwitchState::On => true,
        SwitchState::Off => false,
    };

    store.store().set_enabled(enabled).await?;
    store.persist().await?;
    let label = if enabled { "on" } else { "off" };
    debug!("Saved master switch ({}) to {}.", label, store.path().display());
    if !quiet {
        success_msg(format!("Master switch turned {}.", label));
    }
    Ok(())
}
