//! Product item types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::ids::ItemId;

/// A candidate product listing to weave into the narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display text, also used for scoring.
    pub title: String,
    /// Currency-agnostic integer price.
    pub price: i64,
    pub url: String,
    /// Opaque image reference (URL or local path). Empty when unknown.
    #[serde(default)]
    pub image_ref: String,
}

impl Item {
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        price: i64,
        url: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            url: url.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// Fails on the first id that appears more than once in `items`.
pub fn ensure_unique_ids(items: &[Item]) -> Result<(), MergeError> {
    let mut seen = BTreeSet::new();
    for item in items {
        if !seen.insert(&item.id) {
            return Err(MergeError::DuplicateItem(item.id.clone()));
        }
    }
    Ok(())
}
