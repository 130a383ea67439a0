//! # Strain Scout CLI (`scout`)
//!
//! The `scout` binary drives the catalog pipeline and the identification
//! pipeline from the command line.
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout init` | Create the SQLite database and run schema migrations |
//! | `scout sources` | List configured catalog sources and their health |
//! | `scout catalog` | Normalize + dedupe all sources into the canonical catalog |
//! | `scout import` | Upsert the canonical catalog into the strain store |
//! | `scout match <image>` | Best visual match against the reference set |
//! | `scout resolve <input>` | Resolve one identification request to a name |
//! | `scout stats` | Store row count and catalog/reference overview |

mod catalog;
mod confidence;
mod config;
mod db;
mod dhash;
mod import;
mod matcher;
mod migrate;
mod models;
mod normalize;
mod progress;
mod resolve;
mod source_delimited;
mod source_json;
mod source_names;
mod sources;
mod stats;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strain Scout — a catalog-driven cannabis strain identification pipeline.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/scout.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "scout",
    about = "Strain Scout — catalog ingestion, visual matching, and strain-name resolution",
    version,
    long_about = "Strain Scout ingests heterogeneous strain-catalog source files into one \
    deduplicated canonical catalog, imports it into a SQLite strain store, and identifies \
    strains by combining perceptual-hash visual matching with packaging/label/AI text signals."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file, the strains table, and the
    /// case-insensitive name index. This command is idempotent — running it
    /// multiple times is safe.
    Init,

    /// List configured catalog sources and their health status.
    Sources,

    /// Build the canonical catalog.
    ///
    /// Parses every configured source file, dedupes records by slug
    /// (first write wins), and writes the pretty-printed JSON artifact.
    Catalog {
        /// Show record counts without writing the artifact.
        #[arg(long)]
        dry_run: bool,
    },

    /// Import the canonical catalog into the strain store.
    ///
    /// Upserts every record keyed by slug; name-index conflicts are
    /// recovered by a name-keyed update. Prints the run summary with
    /// aggregate counters and the store's row count.
    Import,

    /// Find the best visual match for a query image.
    Match {
        /// Path to the query image (JPEG or PNG).
        image: PathBuf,
    },

    /// Resolve one identification request to a canonical name.
    ///
    /// Reads a ResolutionInput JSON document (packaging/label/AI text
    /// signals plus ranked visual matches) from a file, or stdin when the
    /// path is `-`, and prints the ResolutionResult JSON.
    Resolve {
        /// Path to the request JSON, or `-` for stdin.
        input: String,
    },

    /// Print store row count and catalog/reference overview.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Resolution is a pure function of its input document; it needs no
    // configuration or store.
    if let Commands::Resolve { input } = &cli.command {
        resolve::run_resolve(input)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("initialized {}", cfg.db.path.display());
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Catalog { dry_run } => {
            catalog::run_catalog(&cfg, dry_run)?;
        }
        Commands::Import => {
            import::run_import(&cfg, &progress::StderrProgress).await?;
        }
        Commands::Match { image } => {
            matcher::run_match(&cfg, &image)?;
        }
        Commands::Resolve { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
