#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Stable identifier of a section, derived from its position in the document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Builds the position-based identifier for the section at `ordinal`.
    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(format!("s{ordinal:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an item within a merge run.
///
/// Placement tracking compares ids only. Two items with identical field
/// values are still distinct when their ids differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidItemId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Identifier handed out to records that arrive without one.
    pub fn from_index(index: usize) -> Self {
        Self(format!("item-{index:04}"))
    }

    /// Variant of [`ItemId::from_index`] for when that id is already taken.
    ///
    /// Attempt 0 is the plain index id; later attempts append `-{attempt}`.
    pub fn from_index_attempt(index: usize, attempt: usize) -> Self {
        match attempt {
            0 => Self::from_index(index),
            _ => Self(format!("item-{index:04}-{attempt}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_ids_sort_in_document_order() {
        let mut ids = vec![
            SectionId::from_ordinal(10),
            SectionId::from_ordinal(2),
            SectionId::from_ordinal(0),
        ];
        ids.sort();
        let rendered: Vec<&str> = ids.iter().map(SectionId::as_str).collect();
        assert_eq!(rendered, vec!["s000", "s002", "s010"]);
    }

    #[test]
    fn index_ids_gain_a_suffix_on_retry() {
        assert_eq!(ItemId::from_index_attempt(7, 0), ItemId::from_index(7));
        assert_eq!(ItemId::from_index_attempt(7, 2).as_str(), "item-0007-2");
    }

    #[test]
    fn item_id_rejects_blank() {
        assert!(ItemId::new("   ").is_err());
        assert_eq!(ItemId::new(" sku-1 ").unwrap().as_str(), "sku-1");
    }
}
