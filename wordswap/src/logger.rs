//! Logger setup for the wordswap binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// An explicit level overrides `RUST_LOG`; otherwise `RUST_LOG` applies with a
/// default of `warn`. Calling this twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).try_init().ok();
}
