//! Atom feed generation

use chrono::NaiveTime;

use crate::config::SiteConfig;
use crate::content::Document;

/// Build the Atom feed over the most recent posts.
///
/// Returns `None` when there are no posts. The feed's `<updated>` stamp is
/// the newest post date rather than the build time, so an unchanged site
/// produces a byte-identical feed.
pub fn atom_feed(config: &SiteConfig, posts: &[Document]) -> Option<String> {
    let newest = posts.iter().filter_map(|p| p.date).max()?;
    let base_url = config.url.trim_end_matches('/');

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
        base_url
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
    feed.push_str(&format!("  <updated>{}</updated>\n", rfc3339(newest)));
    feed.push_str(&format!("  <id>{}/</id>\n", base_url));
    if !config.author.is_empty() {
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));
    }

    for post in posts.iter().take(config.feed_limit) {
        let Some(date) = post.date else { continue };
        let link = format!("{}/{}/", base_url, post.url_path);

        feed.push_str("  <entry>\n");
        feed.push_str(&format!(
            "    <title>{}</title>\n",
            escape_xml(post.title())
        ));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!("    <published>{}</published>\n", rfc3339(date)));
        feed.push_str(&format!("    <updated>{}</updated>\n", rfc3339(date)));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    Some(feed)
}

/// A publish date as an RFC 3339 timestamp at midnight UTC
fn rfc3339(date: chrono::NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
