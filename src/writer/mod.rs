//! Writer - emits rendered pages into the output directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::RenderedPage;
use crate::error::BuildError;

/// Writes rendered pages under an output root, one `index.html` per URL
/// path. Filesystem failures are fatal for the whole build: the output
/// tree is either fully built or not built.
pub struct Writer {
    output_root: PathBuf,
}

impl Writer {
    pub fn new<P: AsRef<Path>>(output_root: P) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
        }
    }

    /// Output file for a URL path: `<output_root>/<url_path>/index.html`
    pub fn output_path(&self, url_path: &str) -> PathBuf {
        if url_path.is_empty() {
            self.output_root.join("index.html")
        } else {
            self.output_root.join(url_path).join("index.html")
        }
    }

    /// Write a single rendered page, creating parent directories as needed
    pub fn write(&self, page: &RenderedPage) -> Result<(), BuildError> {
        let path = self.output_path(&page.url_path);
        self.write_file(&path, page.html.as_bytes())
    }

    /// Write an arbitrary output file (feeds and the like)
    pub fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, bytes).map_err(|source| BuildError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote {:?}", path);
        Ok(())
    }
}

/// Reject documents whose URL paths would land on the same output file.
///
/// `sources` pairs each URL path with the source file it came from, so the
/// error can name both offenders.
pub fn check_collisions(sources: &[(String, PathBuf)]) -> Result<(), BuildError> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    for (url_path, source) in sources {
        if let Some(first) = seen.insert(url_path.as_str(), source) {
            return Err(BuildError::OutputCollision {
                url_path: url_path.clone(),
                first: first.clone(),
                second: source.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_layout() {
        let writer = Writer::new("/out");
        assert_eq!(
            writer.output_path("2022/04/03/example"),
            PathBuf::from("/out/2022/04/03/example/index.html")
        );
        assert_eq!(writer.output_path(""), PathBuf::from("/out/index.html"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path());
        let page = RenderedPage {
            url_path: "2022/04/03/example".to_string(),
            html: "<p>hi</p>".to_string(),
        };

        writer.write(&page).unwrap();

        let written = dir.path().join("2022/04/03/example/index.html");
        assert_eq!(fs::read_to_string(written).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_write_failure_is_write_error() {
        let dir = TempDir::new().unwrap();
        // A file where a directory is needed forces the failure
        fs::write(dir.path().join("blocked"), "file").unwrap();
        let writer = Writer::new(dir.path().join("blocked"));
        let page = RenderedPage {
            url_path: "a".to_string(),
            html: String::new(),
        };

        assert!(matches!(
            writer.write(&page),
            Err(BuildError::Write { .. })
        ));
    }

    #[test]
    fn test_collision_detection() {
        let sources = vec![
            ("a/b".to_string(), PathBuf::from("one.md")),
            ("c".to_string(), PathBuf::from("two.md")),
            ("a/b".to_string(), PathBuf::from("three.md")),
        ];

        match check_collisions(&sources).unwrap_err() {
            BuildError::OutputCollision { url_path, first, second } => {
                assert_eq!(url_path, "a/b");
                assert_eq!(first, PathBuf::from("one.md"));
                assert_eq!(second, PathBuf::from("three.md"));
            }
            other => panic!("expected OutputCollision, got {other}"),
        }
    }

    #[test]
    fn test_no_collisions() {
        let sources = vec![
            ("a".to_string(), PathBuf::from("one.md")),
            ("b".to_string(), PathBuf::from("two.md")),
        ];
        assert!(check_collisions(&sources).is_ok());
    }
}
