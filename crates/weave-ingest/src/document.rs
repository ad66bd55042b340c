//! Narrative document parsing.
//!
//! Two input shapes are accepted:
//!
//! - **Markdown**: ATX headings (`#` to `######`) start sections. A level-one
//!   heading seen before any section becomes the document title. Text before
//!   the first section heading is the preamble. Headings inside fenced code
//!   blocks are ignored.
//! - **JSON**: `{"title": .., "preamble": .., "sections": [{"heading": ..,
//!   "body": ..}]}` or a bare array of sections. Unknown top-level keys in
//!   the object shape are a parse error.
//!
//! A document without headings parses into zero sections with all text in
//! the preamble.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use weave_model::Document;

use crate::error::{IngestError, Result};

#[derive(Debug, Deserialize)]
struct JsonSection {
    #[serde(default, alias = "heading_text", alias = "title")]
    heading: String,
    #[serde(default, alias = "body_text", alias = "text")]
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    preamble: String,
    #[serde(default)]
    sections: Vec<JsonSection>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocumentShape {
    Full(JsonDocument),
    Sections(Vec<JsonSection>),
}

/// Loads a document, choosing the parser from the file extension.
///
/// `.json` files use the JSON shape; everything else is read as Markdown.
pub fn load_document(path: &Path) -> Result<Document> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        parse_json_document(&contents).map_err(|source| IngestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        parse_markdown(&contents)
    };
    debug!(
        path = %path.display(),
        sections = document.sections.len(),
        has_title = document.title.is_some(),
        "document loaded"
    );
    Ok(document)
}

/// Parses a JSON document.
pub fn parse_json_document(contents: &str) -> serde_json::Result<Document> {
    let shape: JsonDocumentShape = serde_json::from_str(contents)?;
    let (title, preamble, sections) = match shape {
        JsonDocumentShape::Full(doc) => {
            if doc.sections.is_empty() && doc.preamble.trim().is_empty() {
                warn!("JSON document has no sections and no preamble");
            }
            (doc.title, doc.preamble, doc.sections)
        }
        JsonDocumentShape::Sections(sections) => (None, String::new(), sections),
    };
    let mut document = Document::from_pairs(
        title.filter(|t| !t.trim().is_empty()),
        sections
            .into_iter()
            .map(|section| (section.heading.trim().to_string(), section.body.trim().to_string())),
    );
    document.preamble = preamble.trim().to_string();
    Ok(document)
}

/// Parses Markdown text into a document.
pub fn parse_markdown(contents: &str) -> Document {
    let mut title: Option<String> = None;
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    let mut in_fence = false;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        let heading = if in_fence { None } else { atx_heading(line) };
        match heading {
            Some((1, text)) if title.is_none() && sections.is_empty() => {
                title = Some(text.to_string());
            }
            Some((_, text)) => sections.push((text.to_string(), Vec::new())),
            None => match sections.last_mut() {
                Some((_, body)) => body.push(line),
                None => preamble.push(line),
            },
        }
    }

    let mut document = Document::from_pairs(
        title,
        sections
            .into_iter()
            .map(|(heading, body)| (heading, body.join("\n").trim().to_string())),
    );
    document.preamble = preamble.join("\n").trim().to_string();
    document
}

/// Returns `(level, text)` for an ATX heading line.
fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    // More than three spaces of indentation is a code block.
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let level = trimmed.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some((level, text))
}
