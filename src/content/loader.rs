//! Content loader - loads posts and pages from the source directory

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::document::{split_dated_stem, DatedStem};
use super::{Document, DocumentKind, FrontMatter};
use crate::error::BuildError;
use crate::Site;

/// Loads content from the source directory.
///
/// `posts()` and `pages()` are lazy: files are read as the iterator is
/// driven, and calling either again re-walks the directory from scratch.
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// All posts under `<source>/_posts`, unsorted.
    ///
    /// Unpublished drafts are skipped unless the site renders drafts.
    pub fn posts(&self) -> impl Iterator<Item = Result<Document, BuildError>> + '_ {
        let posts_dir = self.site.source_dir.join("_posts");
        let render_drafts = self.site.config.render_drafts;

        WalkDir::new(posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
            .filter_map(move |e| match self.load_post(e.path()) {
                Ok(doc) if !doc.published() && !render_drafts => {
                    tracing::debug!("Skipping draft {:?}", e.path());
                    None
                }
                other => Some(other),
            })
    }

    /// All pages: markdown files outside `_`-prefixed directories.
    pub fn pages(&self) -> impl Iterator<Item = Result<Document, BuildError>> + '_ {
        let source_dir = self.site.source_dir.clone();

        WalkDir::new(&self.site.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(move |e| {
                let path = e.path();
                if !path.is_file() || !is_markdown_file(path) {
                    return false;
                }
                // Skip special directories like _posts and _drafts
                let relative = path.strip_prefix(&source_dir).unwrap_or(path);
                !relative
                    .components()
                    .any(|c| c.as_os_str().to_string_lossy().starts_with('_'))
            })
            .map(|e| self.load_page(e.path()))
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Document, BuildError> {
        let (mut fm, body) = self.read_split(path)?;

        let stem = file_stem(path);
        let (date, raw_slug) = match split_dated_stem(stem) {
            DatedStem::Dated(date, slug) => (date, slug),
            DatedStem::BadDate(_) | DatedStem::Undated => {
                return Err(BuildError::InvalidDate {
                    path: path.to_path_buf(),
                    value: stem.to_string(),
                })
            }
        };

        let slug = slug::slugify(raw_slug);
        let url_path = permalink_path(&self.site.config.permalink, &date, &slug);

        // The loaded document always carries a title and a layout
        if fm.title.is_none() {
            fm.title = Some(raw_slug.to_string());
        }
        if fm.layout.is_none() {
            fm.layout = Some("post".to_string());
        }

        Ok(Document {
            kind: DocumentKind::Post,
            source: self.relative_source(path),
            full_source: path.to_path_buf(),
            front_matter: fm,
            body,
            slug,
            date: Some(date),
            url_path,
        })
    }

    /// Load a single page from a file
    fn load_page(&self, path: &Path) -> Result<Document, BuildError> {
        let (mut fm, body) = self.read_split(path)?;

        let stem = file_stem(path);
        let slug = slug::slugify(stem);

        if fm.title.is_none() {
            fm.title = Some(stem.to_string());
        }
        if fm.layout.is_none() {
            fm.layout = Some("page".to_string());
        }

        // index.md maps to its parent directory's path
        let relative = self.relative_source(path);
        let without_ext = relative
            .trim_end_matches(".markdown")
            .trim_end_matches(".md");
        let url_path = if without_ext == "index" || without_ext.ends_with("/index") {
            without_ext.trim_end_matches("index").trim_matches('/').to_string()
        } else {
            without_ext.trim_matches('/').to_string()
        };

        Ok(Document {
            kind: DocumentKind::Page,
            source: relative,
            full_source: path.to_path_buf(),
            front_matter: fm,
            body,
            slug,
            date: None,
            url_path,
        })
    }

    /// Read a file and split front matter from body
    fn read_split(&self, path: &Path) -> Result<(FrontMatter, String), BuildError> {
        let content = fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| BuildError::MalformedFrontMatter {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok((fm, body.to_string()))
    }

    fn relative_source(&self, path: &Path) -> String {
        path.strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Expand a permalink pattern like `:year/:month/:day/:title/` into a
/// normalized URL path (no leading or trailing slash).
pub fn permalink_path(pattern: &str, date: &chrono::NaiveDate, slug: &str) -> String {
    pattern
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":title", slug)
        .trim_matches('/')
        .to_string()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("untitled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn site_in(dir: &TempDir) -> Site {
        Site::with_config(dir.path(), SiteConfig::default())
    }

    fn write_file(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_post_with_date_prefix() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-04-03-example.md",
            "---\ntitle: Example\nlayout: post\n---\n\nHello.\n",
        );

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let posts: Vec<_> = loader.posts().collect::<Result<_, _>>().unwrap();

        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.title(), "Example");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2022, 4, 3));
        assert_eq!(post.url_path, "2022/04/03/example");
        assert_eq!(post.body.trim(), "Hello.");
    }

    #[test]
    fn test_post_without_date_prefix_is_invalid() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "source/_posts/example.md", "---\ntitle: X\n---\n\nHi.\n");

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let result: Result<Vec<_>, _> = loader.posts().collect();

        assert!(matches!(result, Err(BuildError::InvalidDate { .. })));
    }

    #[test]
    fn test_post_with_bad_calendar_date() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-02-30-impossible.md",
            "---\ntitle: X\n---\n\nHi.\n",
        );

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let result: Result<Vec<_>, _> = loader.posts().collect();

        assert!(matches!(result, Err(BuildError::InvalidDate { .. })));
    }

    #[test]
    fn test_unterminated_front_matter_is_reported() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-04-03-bad.md",
            "---\ntitle: Bad\nno closing delimiter\n",
        );

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let result: Result<Vec<_>, _> = loader.posts().collect();

        match result {
            Err(BuildError::MalformedFrontMatter { path, .. }) => {
                assert!(path.ends_with("2022-04-03-bad.md"));
            }
            other => panic!("expected MalformedFrontMatter, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_page_without_front_matter() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "source/contact.md", "Write me a letter.\n");

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let pages: Vec<_> = loader.pages().collect::<Result<_, _>>().unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title(), "contact");
        assert_eq!(pages[0].layout(), "page");
        assert_eq!(pages[0].url_path, "contact");
    }

    #[test]
    fn test_page_index_maps_to_parent_dir() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "source/about/index.md", "---\ntitle: About\n---\n\nMe.\n");

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let pages: Vec<_> = loader.pages().collect::<Result<_, _>>().unwrap();

        assert_eq!(pages[0].url_path, "about");
    }

    #[test]
    fn test_pages_skip_underscore_directories() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-04-03-example.md",
            "---\ntitle: Example\n---\n\nHello.\n",
        );
        write_file(&dir, "source/contact.md", "Mail me.\n");

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        let pages: Vec<_> = loader.pages().collect::<Result<_, _>>().unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url_path, "contact");
    }

    #[test]
    fn test_drafts_skipped_unless_enabled() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-04-03-draft.md",
            "---\ntitle: Draft\npublished: false\n---\n\nNot yet.\n",
        );

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        assert_eq!(loader.posts().count(), 0);

        let mut config = SiteConfig::default();
        config.render_drafts = true;
        let site = Site::with_config(dir.path(), config);
        let loader = ContentLoader::new(&site);
        assert_eq!(loader.posts().count(), 1);
    }

    #[test]
    fn test_loader_is_restartable() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "source/_posts/2022-04-03-example.md",
            "---\ntitle: Example\n---\n\nHello.\n",
        );

        let site = site_in(&dir);
        let loader = ContentLoader::new(&site);
        assert_eq!(loader.posts().count(), 1);
        assert_eq!(loader.posts().count(), 1);
    }

    #[test]
    fn test_permalink_path() {
        let date = NaiveDate::from_ymd_opt(2022, 4, 3).unwrap();
        assert_eq!(
            permalink_path(":year/:month/:day/:title/", &date, "example"),
            "2022/04/03/example"
        );
        assert_eq!(permalink_path("posts/:title/", &date, "example"), "posts/example");
    }
}
