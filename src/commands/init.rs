//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site skeleton in the given directory
pub fn run(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;
    fs::create_dir_all(target_dir.join("layouts"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already a site: {:?} exists", config_path);
    }

    let config_content = r#"# Site
title: A blog
author: ''
description: ''

# URL
url: http://example.com
permalink: :year/:month/:day/:title/

# Directory
source_dir: source
output_dir: public
layouts_dir: layouts

# Build
# strict: abort on the first bad document instead of skipping it
strict: false
render_drafts: false

# Feed
feed_limit: 20

highlight:
  theme: base16-ocean.dark
  line_number: false
"#;
    fs::write(&config_path, config_content)?;

    let today = chrono::Local::now().date_naive();
    let sample = "---\ntitle: Hello World\nlayout: post\n---\n\nWelcome to your new blog. \
         This post lives in `source/_posts`; its filename date decides where \
         it appears in the archive.\n";
    fs::write(
        target_dir
            .join("source/_posts")
            .join(format!("{}-hello-world.md", today.format("%Y-%m-%d"))),
        sample,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_a_buildable_site() {
        let dir = TempDir::new().unwrap();
        run(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("source/_posts").is_dir());

        let site = Site::new(dir.path()).unwrap();
        let report = crate::commands::build::run(&site).unwrap();
        assert!(report.written >= 2);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        run(dir.path()).unwrap();
        assert!(run(dir.path()).is_err());
    }
}
