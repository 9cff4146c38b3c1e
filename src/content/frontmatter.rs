//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Errors from splitting and parsing a front-matter block.
///
/// Carries no file path; the loader attaches the offending path when it
/// converts these into build errors.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("opening `---` delimiter has no closing `---`")]
    Unterminated,
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("opening `;;;` delimiter has no closing `;;;`")]
    UnterminatedJson,
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(deserialize_with = "string_or_vec", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Documents are published unless explicitly marked otherwise
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub published: bool,

    /// Additional custom fields, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            layout: None,
            tags: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse front matter from the start of a source file.
    /// Returns (front_matter, remaining_content).
    ///
    /// A file that does not open with a delimiter is a whole-body document
    /// with empty metadata. An opening delimiter without its closing twin
    /// is an error, never a silent fallback.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        if let Some(rest) = strip_delimiter_line(content, "---") {
            return Self::parse_yaml(rest);
        }

        // JSON front matter (;;; fences or a leading object)
        if let Some(rest) = strip_delimiter_line(content, ";;;") {
            return Self::parse_json_fenced(rest);
        }
        if content.trim_start().starts_with('{') {
            return Self::parse_json_object(content.trim_start());
        }

        Ok((FrontMatter::new(), content))
    }

    fn parse_yaml(rest: &str) -> Result<(Self, &str), FrontMatterError> {
        let (block, remaining) =
            split_at_closing_line(rest, "---").ok_or(FrontMatterError::Unterminated)?;

        if block.trim().is_empty() {
            return Ok((FrontMatter::new(), remaining));
        }

        let fm: FrontMatter = serde_yaml::from_str(block)?;
        Ok((fm, remaining))
    }

    fn parse_json_fenced(rest: &str) -> Result<(Self, &str), FrontMatterError> {
        let (block, remaining) =
            split_at_closing_line(rest, ";;;").ok_or(FrontMatterError::UnterminatedJson)?;

        let fm: FrontMatter = serde_json::from_str(block)?;
        Ok((fm, remaining))
    }

    fn parse_json_object(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // Find the matching closing brace of the leading object
        let mut depth = 0usize;
        let mut end = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if end == 0 {
            return Err(FrontMatterError::UnterminatedJson);
        }

        let fm: FrontMatter = serde_json::from_str(&content[..end])?;
        let remaining = content[end..].trim_start_matches(['\n', '\r']);
        Ok((fm, remaining))
    }

    /// Serialize back to a source-file prefix. Empty metadata yields no
    /// block at all, so parse/serialize round-trips.
    pub fn to_source_prefix(&self) -> Result<String, serde_yaml::Error> {
        if *self == FrontMatter::new() {
            return Ok(String::new());
        }
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n\n", yaml))
    }
}

/// If `content` opens with a line consisting of `delim`, return the text
/// after that line.
fn strip_delimiter_line<'a>(content: &'a str, delim: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(delim)?;
    let rest = rest.strip_prefix('\r').unwrap_or(rest);
    rest.strip_prefix('\n')
}

/// Split `rest` at the first line consisting of `delim`, returning the
/// block before it and the content after it.
fn split_at_closing_line<'a>(rest: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']).trim() == delim {
            let block = &rest[..offset];
            let remaining = &rest[offset + line.len()..];
            return Some((block, remaining.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    None
}
