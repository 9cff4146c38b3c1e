//! CLI entry point for inkpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version)]
#[command(about = "A small static site generator for Markdown blogs", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Layout to use (post, page)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new document
        title: String,
    },

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Render unpublished drafts too
        #[arg(long)]
        drafts: bool,

        /// Abort on the first bad document instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Clean the output directory
    Clean,

    /// List site content (post, page, tag)
    List {
        #[arg(default_value = "post")]
        r#type: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpress=debug,info"
    } else {
        "inkpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            inkpress::commands::init::run(&target_dir)?;
            println!("Initialized new site in {:?}", target_dir);
        }

        Commands::New { layout, title } => {
            let site = inkpress::Site::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            site.new_document(&title, &layout)?;
        }

        Commands::Build { drafts, strict } => {
            let mut site = inkpress::Site::new(&base_dir)?;
            if drafts {
                site.config.render_drafts = true;
            }
            if strict {
                site.config.strict = true;
            }

            let report = site.build()?;
            if report.skipped.is_empty() {
                println!("Built {} files.", report.written);
            } else {
                println!(
                    "Built {} files, skipped {} documents:",
                    report.written,
                    report.skipped.len()
                );
                for err in &report.skipped {
                    println!("  - {}", err.path().display());
                }
            }
        }

        Commands::Clean => {
            let site = inkpress::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned.");
        }

        Commands::List { r#type } => {
            let site = inkpress::Site::new(&base_dir)?;
            inkpress::commands::list::run(&site, &r#type)?;
        }
    }

    Ok(())
}
