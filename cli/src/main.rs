//! Millionaire CLI - plays one quiz session in the terminal.
//!
//! Usage: `millionaire [bank.toml]`. Without an argument the built-in demo
//! bank is used. Logging goes to stderr, controlled by `RUST_LOG`.

mod bank_file;
mod play;

use anyhow::{Context, Result};
use bank_file::BankFile;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BUILTIN_BANK: &str = include_str!("../assets/bank.toml");

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let bank_file = match env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!(path = %path.display(), "loading question bank");
            BankFile::load(&path)?
        }
        None => BankFile::parse(BUILTIN_BANK).context("built-in question bank is invalid")?,
    };
    let (bank, rules) = bank_file.into_parts()?;

    play::run(&bank, rules)
}
