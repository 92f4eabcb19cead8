//! Tessera CLI - themed single-page static site builder.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Themed single-page static site builder")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to tessera.toml, relative to the project root
    #[arg(short, long, default_value = "tessera.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new site in the project root
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "_site")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify the rendered stylesheet
        #[arg(long)]
        minify: bool,
    },

    /// Pull the data feed from the spreadsheet
    Pull {
        /// Feed file to write (defaults to config or "data.json")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let settings_path = cli.root.join(&cli.config);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.root, yes)?;
        }
        Commands::Build { output, minify } => {
            let minify = if minify { Some(true) } else { None };
            commands::build::run(&cli.root, &settings_path, output, minify)?;
        }
        Commands::Pull { output } => {
            commands::pull::run(&cli.root, &settings_path, output)?;
        }
    }

    Ok(())
}
