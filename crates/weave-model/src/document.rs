//! Narrative document types.

use serde::{Deserialize, Serialize};

use crate::ids::SectionId;

/// One unit of ordered narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Position in the document; defines document order.
    pub ordinal: usize,
    /// Short label text, may be empty.
    pub heading_text: String,
    pub body_text: String,
}

impl Section {
    pub fn new(ordinal: usize, heading_text: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            id: SectionId::from_ordinal(ordinal),
            ordinal,
            heading_text: heading_text.into(),
            body_text: body_text.into(),
        }
    }

    /// Text used for relevance scoring: heading and body joined by a space.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.heading_text, self.body_text)
    }
}

/// A parsed narrative document.
///
/// A document without sections is an unstructured blob; its whole text lives
/// in `preamble`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: Option<String>,
    /// Text preceding the first section heading.
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// Builds a document from `(heading, body)` pairs, assigning ordinals in order.
    pub fn from_pairs<H, B>(title: Option<String>, pairs: impl IntoIterator<Item = (H, B)>) -> Self
    where
        H: Into<String>,
        B: Into<String>,
    {
        let sections = pairs
            .into_iter()
            .enumerate()
            .map(|(ordinal, (heading, body))| Section::new(ordinal, heading, body))
            .collect();
        Self {
            title,
            preamble: String::new(),
            sections,
        }
    }

    /// Builds a document with no section structure.
    pub fn unstructured(title: Option<String>, text: impl Into<String>) -> Self {
        Self {
            title,
            preamble: text.into(),
            sections: Vec::new(),
        }
    }

    pub fn is_unstructured(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections sorted by ordinal.
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|section| section.ordinal);
        sections
    }
}
