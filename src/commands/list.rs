//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::loader::ContentLoader;
use crate::content::Document;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);

    match content_type {
        "post" | "posts" => {
            let mut posts = collect(loader.posts());
            posts.sort_by(|a, b| b.date.cmp(&a.date));
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = post
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("  {} - {} [{}]", date, post.title(), post.source);
            }
        }
        "page" | "pages" => {
            let pages = collect(loader.pages());
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title(), page.source);
            }
        }
        "tag" | "tags" => {
            let posts = collect(loader.posts());
            let mut tags: HashMap<String, usize> = HashMap::new();
            for post in &posts {
                for tag in &post.front_matter.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag",
                content_type
            );
        }
    }

    Ok(())
}

/// Drain a loader iterator, warning about unloadable documents
fn collect(
    iter: impl Iterator<Item = Result<Document, crate::BuildError>>,
) -> Vec<Document> {
    iter.filter_map(|item| match item {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!("Failed to load: {}", e);
            None
        }
    })
    .collect()
}
