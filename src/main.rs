//! # fra-ingest
//!
//! Command-line front end for importing FRA measurement files.
//!
//! ## Usage
//!
//! ```bash
//! # Import a file and print the audit record
//! fra-ingest import sweep.csv --pretty
//!
//! # Import, resample to 400 log-spaced points, keep the normalized data
//! fra-ingest import sweep.csv --resample 400 --output sweep.json
//!
//! # Which parser would claim a file?
//! fra-ingest detect export.frax
//!
//! # Parse and validate only
//! fra-ingest validate sweep.csv --config fra-ingest.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
