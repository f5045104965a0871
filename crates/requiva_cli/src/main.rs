//! Requiva CLI
//!
//! Command-line front end for lab purchase-order records.
//!
//! # Commands
//!
//! - `add` - Validate and add one order
//! - `list` - List orders, optionally filtered
//! - `top-items` - Most frequently ordered items
//! - `export` - Write orders to a dated CSV file
//! - `backend` - Show which storage backend is active

mod commands;

use clap::{Parser, Subcommand};
use commands::{AddArgs, FilterArgs};
use requiva_firestore::FirestoreConnector;
use requiva_storage::{
    select_backend, CredentialSource, LocalOnly, RecordStore, RemoteConnector, StoreConfig,
    ENV_COLLECTION, ENV_CREDENTIALS_FILE, ENV_DATA_PATH,
};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Lab purchase-order tracking.
#[derive(Parser)]
#[command(name = "requiva")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the local CSV table
    #[arg(global = true, long, env = ENV_DATA_PATH)]
    data_path: Option<PathBuf>,

    /// Remote collection name
    #[arg(global = true, long, env = ENV_COLLECTION)]
    collection: Option<String>,

    /// Service-account credentials file
    #[arg(global = true, long, env = ENV_CREDENTIALS_FILE)]
    credentials: Option<PathBuf>,

    /// Never try the remote store
    #[arg(global = true, long)]
    local: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and add one order
    Add(AddArgs),

    /// List orders
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the most frequently ordered items
    TopItems {
        /// Number of items to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Export orders to a CSV file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: Requiva_Orders_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the active storage backend
    Backend,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = store_config(&cli);
    let store = open_store(&config, cli.local);

    match cli.command {
        Commands::Add(args) => commands::add::run(&store, args)?,
        Commands::List { filter, format } => commands::list::run(&store, &filter, &format)?,
        Commands::TopItems { limit } => commands::top_items::run(&store, limit)?,
        Commands::Export { filter, output } => commands::export::run(&store, &filter, output)?,
        Commands::Backend => commands::backend::run(&store, &config),
    }

    Ok(())
}

fn store_config(cli: &Cli) -> StoreConfig {
    let mut config = StoreConfig::from_env();
    if let Some(path) = &cli.data_path {
        config = config.with_data_path(path);
    }
    if let Some(collection) = cli.collection.as_deref().filter(|c| !c.trim().is_empty()) {
        config = config.with_collection(collection);
    }
    if let Some(file) = &cli.credentials {
        let credentials = CredentialSource {
            credentials_file: Some(file.clone()),
            ..config.credentials.clone()
        };
        config = config.with_credentials(credentials);
    }
    config
}

fn open_store(config: &StoreConfig, local_only: bool) -> RecordStore {
    let connector: Box<dyn RemoteConnector> = if local_only {
        Box::new(LocalOnly)
    } else {
        match FirestoreConnector::new() {
            Ok(connector) => Box::new(connector),
            Err(err) => {
                warn!(error = %err, "remote client unavailable");
                Box::new(LocalOnly)
            }
        }
    };
    RecordStore::new(select_backend(config, connector.as_ref()))
}
