//! Document and rendered-page models

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

use super::FrontMatter;

lazy_static! {
    /// `YYYY-MM-DD-slug` filename stems used by posts
    static ref DATED_STEM: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").unwrap();
}

/// What kind of source file a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Post,
    Page,
}

/// A loaded source document. Created by the loader, immutable afterwards.
///
/// After loading, `front_matter.title` and `front_matter.layout` are always
/// present: the loader fills them in from the filename stem and the document
/// kind when the source file leaves them out.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: DocumentKind,

    /// Source file path relative to the source directory
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    pub front_matter: FrontMatter,

    /// Raw markdown body
    pub body: String,

    /// URL-safe identifier derived from the filename
    pub slug: String,

    /// Publish date, from the filename prefix. Always set for posts.
    pub date: Option<NaiveDate>,

    /// URL path, no leading or trailing slash; empty means the site root
    pub url_path: String,
}

impl Document {
    pub fn title(&self) -> &str {
        self.front_matter.title.as_deref().unwrap_or("Untitled")
    }

    pub fn layout(&self) -> &str {
        match self.front_matter.layout.as_deref() {
            Some(layout) => layout,
            None => match self.kind {
                DocumentKind::Post => "post",
                DocumentKind::Page => "page",
            },
        }
    }

    pub fn published(&self) -> bool {
        self.front_matter.published
    }

    /// Serialize back to source-file form (front matter block + body)
    pub fn to_source(&self) -> Result<String, serde_yaml::Error> {
        Ok(format!("{}{}", self.front_matter.to_source_prefix()?, self.body))
    }
}

/// Result of splitting a post filename stem into its date prefix and slug
pub enum DatedStem<'a> {
    /// Prefix present and a valid calendar date
    Dated(NaiveDate, &'a str),
    /// Prefix present but not a valid calendar date (e.g. month 13)
    BadDate(&'a str),
    /// No `YYYY-MM-DD-` prefix at all
    Undated,
}

/// Split a filename stem like `2022-04-03-example` into date and slug.
pub fn split_dated_stem(stem: &str) -> DatedStem<'_> {
    let Some(caps) = DATED_STEM.captures(stem) else {
        return DatedStem::Undated;
    };

    // The regex guarantees these are digit runs
    let year: i32 = caps[1].parse().unwrap();
    let month: u32 = caps[2].parse().unwrap();
    let day: u32 = caps[3].parse().unwrap();

    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => DatedStem::Dated(date, caps.get(4).unwrap().as_str()),
        None => DatedStem::BadDate(stem),
    }
}

/// A page ready to be written out. Regenerated on every build.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL path, same normalization as `Document::url_path`
    pub url_path: String,
    pub html: String,
}
