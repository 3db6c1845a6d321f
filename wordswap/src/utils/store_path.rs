//! Locates the rule store file.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const STORE_DIR_NAME: &str = "wordswap";
pub const STORE_FILE_NAME: &str = "store.json";

/// `explicit` when given (from `--store` or `WORDSWAP_STORE`), otherwise
/// `<config dir>/wordswap/store.json`.
pub fn resolve_store_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let config_dir = dirs::config_dir()
        .context("Could not determine the user configuration directory; pass --store")?;
    Ok(config_dir.join(STORE_DIR_NAME).join(STORE_FILE_NAME))
}
