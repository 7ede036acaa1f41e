//! Roster CLI - Sales people and their yearly performance evaluations
//!
//! Usage:
//!   roster person create <sid> <first> <last>
//!   roster person list [--sort id|lastname]
//!   roster eval add <sid> <year> --leadership 4 ...
//!   roster eval latest <sid>
//!   roster seed
//!   roster dump

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::commands::{DumpCommand, EvalCommand, PersonCommand, SeedCommand};
use cli::context::{self, Roster};
use roster_adapter::store::DocumentStore;
use shared::{RosterConfig, StoreKind};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster - Sales people and performance evaluations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep data in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage sales persons
    Person(PersonCommand),
    /// Manage performance evaluations
    Eval(EvalCommand),
    /// Load demo data
    Seed(SeedCommand),
    /// Print the raw stored documents
    Dump(DumpCommand),
}

impl Commands {
    async fn run<S: DocumentStore>(
        &self,
        store: Arc<S>,
        config: &RosterConfig,
        json: bool,
    ) -> anyhow::Result<()> {
        let roster = Roster::new(store, config);
        match self {
            Commands::Person(cmd) => cmd.run(&roster, json).await,
            Commands::Eval(cmd) => cmd.run(&roster, json).await,
            Commands::Seed(cmd) => cmd.run(&roster, json).await,
            Commands::Dump(cmd) => cmd.run(&roster).await.map(|_| ()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = RosterConfig::load(cli.config.as_deref())?;
    if cli.memory {
        config.store = StoreKind::Memory;
    }

    // Initialize logging
    shared::init_logging(&config.log_level)?;
    tracing::debug!(
        store = ?config.store,
        collection = %config.collection_namespace(),
        "Configuration loaded"
    );

    match config.store {
        StoreKind::Memory => {
            let store = context::memory_store(&config);
            cli.command.run(store, &config, cli.json).await
        }
        StoreKind::File => {
            let store = context::file_store(&config)?;
            cli.command.run(store, &config, cli.json).await
        }
    }
}
