//! wayfind CLI - configuration-driven documentation sites.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "wayfind")]
#[command(about = "Configuration-driven documentation site generator and checker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to wayfind.toml config file
    #[arg(short, long, default_value = wayfind_config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Profile overlay to apply (reads wayfind.<PROFILE>.toml)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold wayfind.toml and starter content
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build static documentation site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview built documentation
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "4321")]
        port: u16,

        /// Directory to serve (defaults to the configured output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Open the site in a browser
        #[arg(long)]
        open: bool,
    },

    /// Print the sidebar tree with the file backing each slug
    Sidebar,

    /// Check sidebar slugs or a rendered site
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },
}

#[derive(Subcommand)]
enum CheckTarget {
    /// Verify every sidebar slug has a content file
    Slugs,

    /// Run checks against a rendered site
    Site {
        /// Base URL of a running site (defaults to check.base_url)
        #[arg(long, conflicts_with = "serve")]
        url: Option<String>,

        /// Build and serve the site on a free port, then check it
        #[arg(long)]
        serve: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, profile, output, minify)?;
        }
        Commands::Serve { port, dir, open } => {
            commands::serve::run(&cli.config, profile, port, dir, open).await?;
        }
        Commands::Sidebar => {
            commands::sidebar::run(&cli.config, profile)?;
        }
        Commands::Check { target } => match target {
            CheckTarget::Slugs => commands::check::slugs(&cli.config, profile)?,
            CheckTarget::Site { url, serve } => {
                commands::check::site(&cli.config, profile, url, serve).await?
            }
        },
    }

    Ok(())
}
