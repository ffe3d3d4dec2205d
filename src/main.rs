//! Keymaster - resolve queries to knowledge doors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keymaster::config::{ConfigError, ConfigLoader, KeymasterConfig};
use keymaster::index::IndexError;
use keymaster::resolver::Resolver;

/// Failures that end a CLI invocation.
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(
    name = "keymaster",
    about = "Resolve queries to knowledge doors and their prerequisites",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file to load instead of the default search paths.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Knowledge root, overriding the config file.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a door code, semantic path, alias or free-text query.
    Find {
        /// The query to resolve.
        query: String,
        /// Skip prerequisite expansion.
        #[arg(long)]
        no_prerequisites: bool,
    },
    /// Resolve an error message to the door that explains it.
    Error {
        /// The error text.
        text: String,
        /// Skip prerequisite expansion.
        #[arg(long)]
        no_prerequisites: bool,
    },
    /// Load a named chain of doors.
    Chain {
        /// Chain name.
        name: String,
    },
    /// Print the onboarding summary of a door.
    Summary {
        /// Door code.
        door_code: String,
    },
    /// List indexed doors.
    List {
        /// Only doors in this category.
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum number of doors to list.
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<KeymasterConfig, CliError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;
    if let Some(root) = &cli.root {
        config.knowledge_root.clone_from(root);
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let resolver = Resolver::open(&config)?;
    tracing::debug!(?resolver, "Opened knowledge base");

    match cli.command {
        Commands::Find {
            query,
            no_prerequisites,
        } => {
            let expand = config.expand_prerequisites && !no_prerequisites;
            print_json(&resolver.resolve(&query, expand).await)
        }
        Commands::Error {
            text,
            no_prerequisites,
        } => {
            let expand = config.expand_prerequisites && !no_prerequisites;
            print_json(&resolver.resolve_error(&text, expand).await)
        }
        Commands::Chain { name } => print_json(&resolver.load_chain(&name).await),
        Commands::Summary { door_code } => {
            print!("{}", resolver.onboarding_summary(&door_code).await);
            Ok(())
        }
        Commands::List { category, limit } => {
            print_json(&resolver.list_doors(category.as_deref(), limit).await)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "keymaster failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
