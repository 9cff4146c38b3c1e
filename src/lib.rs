//! inkpress: a small static site generator for Markdown blogs
//!
//! Walks a source directory of Markdown documents with `---`-delimited
//! front matter, renders each through a named layout template, and writes
//! a static HTML tree with one `index.html` per URL path.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod render;
pub mod templates;
pub mod writer;

pub use error::BuildError;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site rooted at a directory: configuration plus resolved paths
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Layout templates directory
    pub layouts_dir: PathBuf,
}

impl Site {
    /// Create a site from a base directory, reading `_config.yml` when
    /// present and falling back to defaults otherwise
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let layouts_dir = base_dir.join(&config.layouts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            output_dir,
            layouts_dir,
        }
    }

    /// Build the static site
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self)
    }

    /// Clean the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post or page
    pub fn new_document(&self, title: &str, layout: &str) -> Result<()> {
        commands::new::run(self, title, layout)
    }
}
