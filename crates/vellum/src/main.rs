//! Vellum CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod loader;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(version)]
#[command(about = "Precompile and render storefront theme templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Precompile every .html template under a directory into a JSON bundle
    Precompile {
        /// Template directory
        dir: PathBuf,

        /// Write the bundle to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Engine version (v3 or v4)
        #[arg(long)]
        engine: Option<String>,
    },

    /// Render a registered template
    Render {
        /// Registry path of the template to render (e.g. pages/home)
        path: String,

        /// Template directory or precompiled JSON bundle
        #[arg(short = 't', long)]
        templates: PathBuf,

        /// JSON file with the render context
        #[arg(short = 'c', long)]
        context: Option<PathBuf>,

        /// YAML or JSON renderer configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Engine version (v3 or v4), overriding the configuration
        #[arg(long)]
        engine: Option<String>,
    },

    /// Render template source given on the command line
    RenderString {
        /// Template source
        source: String,

        /// JSON file with the render context
        #[arg(short = 'c', long)]
        context: Option<PathBuf>,

        /// YAML or JSON renderer configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Engine version (v3 or v4), overriding the configuration
        #[arg(long)]
        engine: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vellum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Precompile {
            dir,
            output,
            engine,
        } => commands::precompile::execute(commands::precompile::PrecompileArgs {
            dir,
            output,
            engine,
        }),
        Commands::Render {
            path,
            templates,
            context,
            config,
            engine,
        } => commands::render::execute(commands::render::RenderArgs {
            path,
            templates,
            options: commands::RendererOptions {
                context,
                config,
                engine,
            },
        }),
        Commands::RenderString {
            source,
            context,
            config,
            engine,
        } => commands::render::execute_string(commands::render::RenderStringArgs {
            source,
            options: commands::RendererOptions {
                context,
                config,
                engine,
            },
        }),
    }
}
