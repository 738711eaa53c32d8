// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Cytoscan: Batch Microscopy Image Classification Client
//!
//! Submits batches of cell images to a remote classification service and
//! renders the aggregated viability counts.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use cytoscan::client::ClassifierClient;
use cytoscan::config::AppConfig;
use cytoscan::controller::{SubmissionController, SubmissionState};
use cytoscan::interpret::SchemaVariant;
use cytoscan::render;
use cytoscan::selection::{read_selection, SelectionStore};
use cytoscan::Result;

/// Cytoscan CLI - Batch Microscopy Image Classification Client
#[derive(Parser, Debug)]
#[command(name = "cytoscan")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.2.0")]
#[command(about = "Batch microscopy image classification client", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a batch of images for classification
    Classify {
        /// Image files to submit
        paths: Vec<PathBuf>,

        /// Response schema override (extended or basic)
        #[arg(long, value_parser = ["extended", "basic"])]
        schema: Option<String>,
    },

    /// Check classification service reachability
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if !cli.quiet {
        info!("Cytoscan v1.2.0 - Batch Classification Client");
    }

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Classify { paths, schema } => {
            run_classify(config, paths, schema, &cli.format).await
        }
        Commands::Status => run_status(config).await,
        Commands::Config { action } => run_config_command(config, action, &cli.config).await,
    }
}

/// Read the named files, submit them as one batch, and render the outcome
async fn run_classify(
    config: AppConfig,
    paths: Vec<PathBuf>,
    schema_override: Option<String>,
    format: &str,
) -> Result<()> {
    let variant: SchemaVariant = match schema_override {
        Some(s) => s.parse()?,
        None => config.schema,
    };
    info!("Using {} schema against {}", variant, config.service.url);

    let mut store = SelectionStore::new();
    store.set_selection(read_selection(&paths, &config.selection)?);

    let client = ClassifierClient::new(&config.service.url, config.service.timeout_secs);
    let controller = SubmissionController::new(Arc::new(client), variant);

    // Presentation mirror of the Loading state: the placeholder shows while
    // the request is in flight; an empty selection settles synchronously
    // and never loads
    if format == "text" && !store.is_empty() {
        print!("{}", render::render(&SubmissionState::Loading));
    }

    let state = controller.submit(&store).await;

    match format {
        "json" => match &state {
            SubmissionState::Success(results) => {
                println!("{}", serde_json::to_string_pretty(&render::to_json(results))?);
            }
            SubmissionState::Failure(msg) => {
                println!("{}", serde_json::json!({ "error": msg }));
            }
            _ => {}
        },
        _ => print!("{}", render::render(&state)),
    }

    Ok(())
}

/// Run service reachability check
async fn run_status(config: AppConfig) -> Result<()> {
    let client = ClassifierClient::new(&config.service.url, config.service.timeout_secs);

    println!("Cytoscan v1.2.0 Status");
    println!("======================");

    match client.preflight().await {
        Ok(()) => println!("Classification service: Reachable"),
        Err(e) => println!("Classification service: Error - {}", e),
    }

    println!("\nConfiguration:");
    println!("  Endpoint: {}", client.endpoint());
    println!("  Schema: {}", config.schema);
    println!("  Timeout: {}s", config.service.timeout_secs);
    println!("  Formats: {:?}", config.selection.formats);

    Ok(())
}

/// Run config commands
async fn run_config_command(
    config: AppConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = AppConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  Endpoint: {}", config.service.url);
            println!("  Schema: {}", config.schema);
        }
    }

    Ok(())
}
