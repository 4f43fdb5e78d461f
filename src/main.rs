//! pagekv - a tiny persistent key-value store

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use pagekv::config::{DatabaseConfig, ReplacerKind, DEFAULT_PATH};
use pagekv::database::Database;
use pagekv::repl;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// pagekv - a page-based key-value store with a write-back page cache
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backing data file
    #[arg(short, long, default_value = DEFAULT_PATH)]
    path: PathBuf,

    /// Number of pages kept in the buffer pool
    #[arg(short, long, default_value = "10")]
    cache_capacity: NonZeroUsize,

    /// Page eviction policy
    #[arg(long, value_enum, default_value_t = ReplacerKind::Fifo)]
    replacer: ReplacerKind,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = DatabaseConfig::new(args.path)
        .with_cache_capacity(args.cache_capacity)
        .with_replacer(args.replacer);

    let mut db = Database::open(&config)
        .with_context(|| format!("Can't open db file {}", config.path.display()))?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = repl::run(&mut db, stdin.lock(), stdout.lock());

    // Flush and close even if the command loop failed.
    db.close().context("Failed to flush database")?;
    result
}
