//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub description: String,

    // URL
    pub url: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,
    pub output_dir: String,
    pub layouts_dir: String,

    // Build behavior
    /// Abort on the first document error instead of skipping and reporting
    pub strict: bool,
    pub render_drafts: bool,

    // Feed
    pub feed_limit: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "A blog".to_string(),
            author: String::new(),
            description: String::new(),

            url: "http://example.com".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),
            output_dir: "public".to_string(),
            layouts_dir: "layouts".to_string(),

            strict: false,
            render_drafts: false,

            feed_limit: 20,

            highlight: HighlightConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.permalink, ":year/:month/:day/:title/");
        assert_eq!(config.output_dir, "public");
        assert!(!config.strict);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
strict: true
feed_limit: 10
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert!(config.strict);
        assert_eq!(config.feed_limit, 10);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let yaml = r#"
title: My Blog
github_username: someone
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.extra.get("github_username").and_then(|v| v.as_str()),
            Some("someone")
        );
    }
}
