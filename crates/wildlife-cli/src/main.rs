//! Wildlife Sightings CLI
//!
//! Record, browse and follow wildlife sightings on a Wildlife Sightings server.

mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, error};
use wildlife_core::SightingFilter;

#[derive(Parser)]
#[command(name = "wildlife")]
#[command(author, version, about = "Wildlife Sightings - record and browse wildlife observations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new sighting (prompts for missing required fields)
    Record {
        /// Species name
        #[arg(short, long)]
        species: Option<String>,

        /// Species type (e.g. Bird, Mammal)
        #[arg(short = 't', long = "type")]
        species_type: Option<String>,

        /// Coordinates as "lat, lng"
        #[arg(short, long)]
        coordinates: Option<String>,

        /// Observation date (defaults to today on the server, dd/mm/yyyy)
        #[arg(long)]
        date: Option<String>,

        /// Observation time (defaults to now on the server, HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Image file to attach (repeatable)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,
    },

    /// List recorded sightings
    List {
        /// Case-insensitive search over species and coordinates
        #[arg(short, long)]
        search: Option<String>,

        /// Only this species type
        #[arg(short = 't', long = "type")]
        species_type: Option<String>,

        /// Only sightings at exactly these coordinates
        #[arg(short, long)]
        location: Option<String>,

        /// Print the distinct species types instead of sightings
        #[arg(long)]
        types: bool,
    },

    /// Show sightings grouped into map markers
    Markers,

    /// Attach images to an existing sighting
    Attach {
        /// Sighting ID
        id: String,

        /// Image file to attach (repeatable)
        #[arg(short, long = "image", required = true)]
        images: Vec<PathBuf>,

        /// Keep existing images instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Follow new sightings in real time
    Watch,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set the server URL
    SetServer {
        /// Server URL (e.g., http://localhost:3001)
        url: String,
    },
    /// Show current configuration
    Show,
    /// Reset to default configuration
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "wildlife_cli=debug,wildlife_core=debug"
        } else {
            "wildlife_cli=warn"
        })
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Starting Wildlife CLI");

    let result = match cli.command {
        Commands::Record {
            species,
            species_type,
            coordinates,
            date,
            time,
            images,
        } => {
            commands::record::execute(commands::record::RecordOptions {
                species,
                species_type,
                coordinates,
                date,
                time,
                images,
            })
            .await
        }
        Commands::List {
            search,
            species_type,
            location,
            types,
        } => {
            let filter = SightingFilter {
                search,
                species_type,
                location,
            };
            commands::list::execute(filter, types).await
        }
        Commands::Markers => commands::markers::execute().await,
        Commands::Attach { id, images, append } => {
            commands::attach::execute(&id, &images, append).await
        }
        Commands::Watch => commands::watch::execute().await,
        Commands::Config { action } => match action {
            ConfigAction::SetServer { url } => commands::config::set_server(&url).await,
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::Reset => commands::config::reset().await,
        },
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
