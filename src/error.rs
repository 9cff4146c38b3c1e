//! Build error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the build pipeline, each carrying the offending path.
///
/// Document-scoped variants (`MalformedFrontMatter`, `InvalidDate`,
/// `UnknownLayout`, `MarkdownSyntax`) abort only that document in
/// best-effort builds and the whole build in strict mode. `Write` and
/// `OutputCollision` are always fatal.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front matter in {path:?}: {reason}")]
    MalformedFrontMatter { path: PathBuf, reason: String },

    #[error("missing or invalid `YYYY-MM-DD` date prefix `{value}` in filename {path:?}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("unknown layout `{layout}` referenced by {path:?}")]
    UnknownLayout { layout: String, path: PathBuf },

    #[error("unterminated code fence opened at line {line} of {path:?}")]
    MarkdownSyntax { path: PathBuf, line: usize },

    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("documents {first:?} and {second:?} both map to output path {url_path}/index.html")]
    OutputCollision {
        url_path: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl BuildError {
    /// Whether this error aborts the build even in best-effort mode.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BuildError::Write { .. } | BuildError::OutputCollision { .. }
        )
    }

    /// The source file (or output path) the error is attached to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            BuildError::Read { path, .. }
            | BuildError::MalformedFrontMatter { path, .. }
            | BuildError::InvalidDate { path, .. }
            | BuildError::UnknownLayout { path, .. }
            | BuildError::MarkdownSyntax { path, .. }
            | BuildError::Write { path, .. } => path,
            BuildError::OutputCollision { second, .. } => second,
        }
    }
}
