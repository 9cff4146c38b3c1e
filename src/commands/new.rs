//! Create a new post or page

use anyhow::Result;
use std::fs;

use crate::content::FrontMatter;
use crate::Site;

/// Create a new post or page source file with a front-matter stub
pub fn run(site: &Site, title: &str, layout: &str) -> Result<()> {
    let slug = slug::slugify(title);

    let mut fm = FrontMatter::new();
    fm.title = Some(title.to_string());
    fm.layout = Some(layout.to_string());
    let content = fm.to_source_prefix()?;

    let file_path = match layout {
        "page" => site.source_dir.join(&slug).join("index.md"),
        _ => {
            let today = chrono::Local::now().date_naive();
            site.source_dir
                .join("_posts")
                .join(format!("{}-{}.md", today.format("%Y-%m-%d"), slug))
        }
    };

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_loads_back() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        run(&site, "Hello World", "post").unwrap();

        let loader = ContentLoader::new(&site);
        let posts: Vec<_> = loader.posts().collect::<Result<_, _>>().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title(), "Hello World");
        assert_eq!(posts[0].layout(), "post");
    }

    #[test]
    fn test_new_page_is_an_index_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        run(&site, "About Me", "page").unwrap();

        assert!(dir.path().join("source/about-me/index.md").exists());
    }

    #[test]
    fn test_existing_file_is_refused() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());

        run(&site, "Twice", "post").unwrap();
        assert!(run(&site, "Twice", "post").is_err());
    }
}
