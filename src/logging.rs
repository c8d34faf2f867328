//! Logger setup for the binary.
//!
//! The terminal is in raw mode on the alternate screen while the simulation
//! runs, so logs go to the file named by `SKIRMISH_LOG_PATH`. Without one the
//! default filter is `off`; `RUST_LOG` overrides it either way and the output
//! then goes to stderr.

use std::fs::File;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

use crate::engine::SimConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_level(config: &SimConfig) -> LevelFilter {
    if config.log_path.is_some() {
        LevelFilter::Info
    } else {
        LevelFilter::Off
    }
}

/// Initializes the global logger from `config`.
pub fn init(config: &SimConfig) -> Result<()> {
    let env = Env::default().default_filter_or(default_level(config).to_string());
    let mut builder = Builder::from_env(env);

    if let Some(path) = config.log_path.as_deref() {
        let file = File::create(path).with_context(|| format!("creating log file {}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // `try_init` only fails if a logger was already set; keep the first one.
    let _ = builder.try_init();
    Ok(())
}
