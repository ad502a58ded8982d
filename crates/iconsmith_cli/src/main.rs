//! iconsmith - icon theme generator
//!
//! - `generate`: build every configured theme from the mapping table
//! - `reconcile`: reconstruct the mapping of an existing theme tree

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate icon themes from SVG sources
#[derive(Parser, Debug)]
#[command(name = "iconsmith")]
#[command(about = "Generate icon themes from SVG sources")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every theme in the configuration
    Generate {
        /// Theme configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Mapping of canonical names to installed paths
        #[arg(short, long, default_value = "mapping.yaml")]
        mapping: PathBuf,

        /// Template for each theme's index.theme
        #[arg(long, default_value = "index.theme")]
        index_template: PathBuf,

        /// Directory the theme destinations are created in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Skip symbolic variants even if the converter is installed
        #[arg(long)]
        no_symbolic: bool,
    },

    /// Print the alias mapping found in a generated theme
    Reconcile {
        /// Theme directory (the one containing `scalable/`)
        theme: PathBuf,

        /// Reconcile the symbolic tree instead of the scalable one
        #[arg(long)]
        symbolic: bool,

        /// Write the mapping to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Generate {
            config,
            mapping,
            index_template,
            output_dir,
            no_symbolic,
        } => commands::generate(&config, &mapping, &index_template, &output_dir, !no_symbolic),
        Commands::Reconcile {
            theme,
            symbolic,
            output,
        } => commands::reconcile(&theme, symbolic, output.as_deref()),
    }
}
