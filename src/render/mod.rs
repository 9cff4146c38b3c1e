//! Renderer - expands documents into HTML pages through named templates

use crate::config::SiteConfig;
use crate::content::{Document, MarkdownRenderer, RenderedPage};
use crate::error::BuildError;
use crate::templates::TemplateRegistry;

/// Renders documents against an immutable template registry.
///
/// Rendering is deterministic and side-effect free: the same document and
/// registry always produce byte-identical HTML.
pub struct Renderer {
    registry: TemplateRegistry,
    markdown: MarkdownRenderer,
    site_title: String,
}

impl Renderer {
    pub fn new(config: &SiteConfig, registry: TemplateRegistry) -> Self {
        let markdown = MarkdownRenderer::with_options(
            &config.highlight.theme,
            config.highlight.line_number,
        );
        Self {
            registry,
            markdown,
            site_title: config.title.clone(),
        }
    }

    /// Render a single document
    pub fn render(&self, doc: &Document) -> Result<RenderedPage, BuildError> {
        let layout = doc.layout();
        let template = self
            .registry
            .get(layout)
            .ok_or_else(|| BuildError::UnknownLayout {
                layout: layout.to_string(),
                path: doc.full_source.clone(),
            })?;

        let content =
            self.markdown
                .render(&doc.body)
                .map_err(|e| BuildError::MarkdownSyntax {
                    path: doc.full_source.clone(),
                    line: e.line,
                })?;

        let date = doc
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let html = template
            .replace("{title}", &html_escape(doc.title()))
            .replace("{content}", &content)
            .replace("{tags}", &tag_list(&doc.front_matter.tags))
            .replace("{date}", &date)
            .replace("{site_title}", &html_escape(&self.site_title));

        Ok(RenderedPage {
            url_path: doc.url_path.clone(),
            html,
        })
    }

    /// Render the front page over all posts (site order), if an `index`
    /// layout is registered.
    pub fn render_index(&self, posts: &[Document]) -> Option<RenderedPage> {
        let template = self.registry.get("index")?;

        let mut items = String::new();
        for post in posts {
            let date = post
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            items.push_str(&format!(
                "<li><time>{}</time> <a href=\"/{}/\">{}</a></li>\n",
                date,
                post.url_path,
                html_escape(post.title())
            ));
        }

        let html = template
            .replace("{posts}", items.trim_end())
            .replace("{title}", &html_escape(&self.site_title))
            .replace("{site_title}", &html_escape(&self.site_title));

        Some(RenderedPage {
            url_path: String::new(),
            html,
        })
    }
}

/// Render tags as an unordered list, or nothing when there are none
fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|t| format!("<li>{}</li>", html_escape(t)))
        .collect();
    format!("<ul class=\"tags\">{}</ul>", items)
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DocumentKind, FrontMatter};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn doc(layout: &str, body: &str, tags: &[&str]) -> Document {
        let mut fm = FrontMatter::new();
        fm.title = Some("A Post".to_string());
        fm.layout = Some(layout.to_string());
        fm.tags = tags.iter().map(|t| t.to_string()).collect();
        Document {
            kind: DocumentKind::Post,
            source: "_posts/2022-04-03-a-post.md".to_string(),
            full_source: PathBuf::from("source/_posts/2022-04-03-a-post.md"),
            front_matter: fm,
            body: body.to_string(),
            slug: "a-post".to_string(),
            date: NaiveDate::from_ymd_opt(2022, 4, 3),
            url_path: "2022/04/03/a-post".to_string(),
        }
    }

    fn renderer_with(pairs: &[(&str, &str)]) -> Renderer {
        let config = SiteConfig::default();
        Renderer::new(&config, TemplateRegistry::from_pairs(pairs.to_vec()))
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let renderer = renderer_with(&[("post", "<h1>{title}</h1>{content}{tags}")]);
        let page = renderer.render(&doc("post", "Hello *world*.", &["rust"])).unwrap();

        assert!(page.html.contains("<h1>A Post</h1>"));
        assert!(page.html.contains("<em>world</em>"));
        assert!(page.html.contains("<ul class=\"tags\"><li>rust</li></ul>"));
        assert_eq!(page.url_path, "2022/04/03/a-post");
    }

    #[test]
    fn test_no_tags_renders_nothing() {
        let renderer = renderer_with(&[("post", "{tags}!")]);
        let page = renderer.render(&doc("post", "x", &[])).unwrap();
        assert_eq!(page.html, "!");
    }

    #[test]
    fn test_unknown_layout_names_layout_and_path() {
        let renderer = renderer_with(&[("post", "{content}")]);
        let err = renderer.render(&doc("gallery", "x", &[])).unwrap_err();

        match err {
            BuildError::UnknownLayout { layout, path } => {
                assert_eq!(layout, "gallery");
                assert!(path.ends_with("2022-04-03-a-post.md"));
            }
            other => panic!("expected UnknownLayout, got {other}"),
        }
    }

    #[test]
    fn test_unterminated_fence_carries_path_and_line() {
        let renderer = renderer_with(&[("post", "{content}")]);
        let err = renderer.render(&doc("post", "text\n\n```rust\nbroken\n", &[])).unwrap_err();

        match err {
            BuildError::MarkdownSyntax { path, line } => {
                assert!(path.ends_with("2022-04-03-a-post.md"));
                assert_eq!(line, 3);
            }
            other => panic!("expected MarkdownSyntax, got {other}"),
        }
    }

    #[test]
    fn test_title_is_escaped() {
        let renderer = renderer_with(&[("post", "{title}")]);
        let mut d = doc("post", "x", &[]);
        d.front_matter.title = Some("<script>".to_string());
        let page = renderer.render(&d).unwrap();
        assert_eq!(page.html, "&lt;script&gt;");
    }

    #[test]
    fn test_unrecognized_placeholders_pass_through() {
        let renderer = renderer_with(&[("post", "{title}{unknown}")]);
        let page = renderer.render(&doc("post", "x", &[])).unwrap();
        assert!(page.html.ends_with("{unknown}"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = renderer_with(&[("post", "<h1>{title}</h1>{content}")]);
        let d = doc("post", "Some `code` and a fence:\n\n```\nplain\n```\n", &[]);
        assert_eq!(renderer.render(&d).unwrap().html, renderer.render(&d).unwrap().html);
    }

    #[test]
    fn test_render_index_lists_posts() {
        let renderer = renderer_with(&[("index", "<ul>{posts}</ul>")]);
        let page = renderer.render_index(&[doc("post", "x", &[])]).unwrap();

        assert!(page.html.contains("href=\"/2022/04/03/a-post/\""));
        assert!(page.html.contains("<time>2022-04-03</time>"));
        assert_eq!(page.url_path, "");
    }

    #[test]
    fn test_render_index_without_template() {
        let renderer = renderer_with(&[("post", "{content}")]);
        assert!(renderer.render_index(&[]).is_none());
    }
}
