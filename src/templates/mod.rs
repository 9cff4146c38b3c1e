//! Template registry
//!
//! Default layouts for posts, pages and the front page are embedded in the
//! binary; a site-local layouts directory can override any of them or add
//! new ones, one `<name>.html` file per layout. The registry is built once
//! per run and never mutated afterwards.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// An immutable mapping from layout name to template string.
///
/// Templates use `{placeholder}` substitution; see the renderer for the
/// recognized set.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Registry with only the embedded default layouts
    pub fn embedded() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            "post".to_string(),
            include_str!("defaults/post.html").to_string(),
        );
        templates.insert(
            "page".to_string(),
            include_str!("defaults/page.html").to_string(),
        );
        templates.insert(
            "index".to_string(),
            include_str!("defaults/index.html").to_string(),
        );
        Self { templates }
    }

    /// Embedded defaults plus overrides from a layouts directory.
    ///
    /// A missing directory is fine; files that exist but cannot be read
    /// are not.
    pub fn load<P: AsRef<Path>>(layouts_dir: P) -> Result<Self> {
        let mut registry = Self::embedded();
        let dir = layouts_dir.as_ref();

        if !dir.is_dir() {
            return Ok(registry);
        }

        for entry in fs::read_dir(dir).with_context(|| format!("reading layouts dir {:?}", dir))? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading layout {:?}", path))?;
            registry.templates.insert(name.to_string(), content);
        }

        Ok(registry)
    }

    /// Build a registry from explicit (name, template) pairs
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            templates: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults() {
        let registry = TemplateRegistry::embedded();
        assert!(registry.contains("post"));
        assert!(registry.contains("page"));
        assert!(registry.contains("index"));
        assert!(!registry.contains("gallery"));
    }

    #[test]
    fn test_missing_layouts_dir_is_fine() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::load(dir.path().join("layouts")).unwrap();
        assert!(registry.contains("post"));
    }

    #[test]
    fn test_layouts_dir_overrides_and_extends() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("layouts")).unwrap();
        fs::write(dir.path().join("layouts/post.html"), "<p>{content}</p>").unwrap();
        fs::write(dir.path().join("layouts/gallery.html"), "<div>{content}</div>").unwrap();
        fs::write(dir.path().join("layouts/notes.txt"), "ignored").unwrap();

        let registry = TemplateRegistry::load(dir.path().join("layouts")).unwrap();
        assert_eq!(registry.get("post"), Some("<p>{content}</p>"));
        assert!(registry.contains("gallery"));
        assert!(!registry.contains("notes"));
    }
}
