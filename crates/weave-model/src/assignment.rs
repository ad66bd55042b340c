//! Section-to-item assignment produced by the optimizer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, SectionId};

/// How an item ended up in its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOrigin {
    /// The section was the item's highest scoring match.
    BestMatch,
    /// The item was moved into an empty section during rebalancing.
    Redistributed,
}

/// One item placed directly after a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub item_id: ItemId,
    /// Relevance score against the section it was matched to.
    ///
    /// Redistributed items keep the score of their original match (0 when
    /// they never matched anything).
    pub score: f64,
    pub origin: PlacementOrigin,
}

/// Mapping from sections to the items placed after them, plus the fallback group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub placements: BTreeMap<SectionId, Vec<Placement>>,
    /// Items that could not be placed within capacity, in pool order.
    pub fallback: Vec<ItemId>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.placements.values().all(Vec::is_empty) && self.fallback.is_empty()
    }

    /// Placements for a section, empty when the section received nothing.
    pub fn items_for(&self, section: &SectionId) -> &[Placement] {
        self.placements
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of items placed directly after sections.
    pub fn assigned_count(&self) -> usize {
        self.placements.values().map(Vec::len).sum()
    }

    /// Number of assigned items that were moved by rebalancing.
    pub fn redistributed_count(&self) -> usize {
        self.placements
            .values()
            .flatten()
            .filter(|placement| placement.origin == PlacementOrigin::Redistributed)
            .count()
    }

    /// Every item id mentioned by the assignment, sections first, then fallback.
    pub fn all_item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.placements
            .values()
            .flatten()
            .map(|placement| &placement.item_id)
            .chain(self.fallback.iter())
    }

    /// Ids that occur more than once across sections and the fallback group.
    pub fn duplicate_ids(&self) -> BTreeSet<ItemId> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for id in self.all_item_ids() {
            if !seen.insert(id) {
                duplicates.insert(id.clone());
            }
        }
        duplicates
    }

    /// Largest number of items placed after a single section.
    pub fn max_section_load(&self) -> usize {
        self.placements.values().map(Vec::len).max().unwrap_or(0)
    }
}
