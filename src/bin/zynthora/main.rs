//! zynthora - terminal front end for the paraphonic engine
//!
//! Run with: cargo run --release
//! Logs go to `zynthora.log` in the system temp directory; set `RUST_LOG`
//! to change the level.

mod app;
mod ui;

use std::fs::File;
use std::sync::Mutex;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    app::run()
}

fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("zynthora.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    tracing::info!(log = %path.display(), "logging initialised");
    Ok(())
}
