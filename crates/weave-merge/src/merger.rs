//! Builds the merged document tree from a document and an assignment.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use weave_model::{
    Assignment, BlockKind, Document, Item, ItemBlock, ItemId, MergeError, MergeOptions,
    MergedDocument, Node,
};

/// Resolves item ids to items, handing each id out at most once.
struct Placer<'a> {
    lookup: BTreeMap<&'a ItemId, &'a Item>,
    placed: BTreeSet<ItemId>,
}

impl<'a> Placer<'a> {
    fn new(items: &'a [Item]) -> Result<Self, MergeError> {
        let mut lookup = BTreeMap::new();
        for item in items {
            if lookup.insert(&item.id, item).is_some() {
                return Err(MergeError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self {
            lookup,
            placed: BTreeSet::new(),
        })
    }

    /// Returns the item for `id`, or `None` if it was already placed.
    fn take(&mut self, id: &ItemId) -> Result<Option<Item>, MergeError> {
        let item = self
            .lookup
            .get(id)
            .ok_or_else(|| MergeError::UnknownItem(id.clone()))?;
        if !self.placed.insert(id.clone()) {
            warn!(item_id = %id, "skipping duplicate placement");
            return Ok(None);
        }
        Ok(Some((*item).clone()))
    }

    fn is_placed(&self, id: &ItemId) -> bool {
        self.placed.contains(id)
    }
}

/// Merges `assignment` into `document`, producing a new tree.
///
/// Sections are emitted in ordinal order, each followed by a block with its
/// placed items (at most `options.capacity`). Items that are not placed after
/// a section end up in a trailing fallback block, or in a standalone block
/// when the document has no sections. Those blocks display at most
/// `options.fallback_cap` items; the rest are recorded as withheld.
///
/// The input document is never modified. Identical inputs produce an
/// identical tree.
pub fn merge(
    document: &Document,
    items: &[Item],
    assignment: &Assignment,
    options: &MergeOptions,
) -> Result<MergedDocument, MergeError> {
    options.validate()?;
    let mut placer = Placer::new(items)?;
    let mut nodes = Vec::with_capacity(document.sections.len() * 2 + 1);
    let mut spill: Vec<ItemId> = Vec::new();

    let sections = document.ordered_sections();
    let known_sections: BTreeSet<_> = sections.iter().map(|section| &section.id).collect();
    for (section_id, placements) in &assignment.placements {
        if !known_sections.contains(section_id) {
            warn!(section_id = %section_id, items = placements.len(), "assignment names unknown section");
            spill.extend(placements.iter().map(|p| p.item_id.clone()));
        }
    }

    for section in sections {
        nodes.push(Node::Section(section.clone()));
        let placements = assignment.items_for(&section.id);
        let mut block_items = Vec::new();
        for placement in placements {
            if block_items.len() >= options.capacity {
                spill.push(placement.item_id.clone());
                continue;
            }
            if let Some(item) = placer.take(&placement.item_id)? {
                block_items.push(item);
            }
        }
        if !block_items.is_empty() {
            debug!(section_id = %section.id, items = block_items.len(), "injecting item block");
            nodes.push(Node::ItemBlock(ItemBlock {
                kind: BlockKind::Related {
                    section_id: section.id.clone(),
                },
                items: block_items,
            }));
        }
    }

    let mut leftovers: Vec<Item> = Vec::new();
    for id in spill.iter().chain(assignment.fallback.iter()) {
        if let Some(item) = placer.take(id)? {
            leftovers.push(item);
        }
    }
    for item in items {
        if !placer.is_placed(&item.id) {
            warn!(item_id = %item.id, "item missing from assignment, adding to fallback");
            if let Some(item) = placer.take(&item.id)? {
                leftovers.push(item);
            }
        }
    }

    let mut withheld = Vec::new();
    if !leftovers.is_empty() {
        if leftovers.len() > options.fallback_cap {
            withheld = leftovers
                .split_off(options.fallback_cap)
                .into_iter()
                .map(|item| item.id)
                .collect();
        }
        let kind = if document.is_unstructured() {
            BlockKind::Standalone
        } else {
            BlockKind::Fallback
        };
        debug!(items = leftovers.len(), withheld = withheld.len(), ?kind, "appending trailing block");
        nodes.push(Node::ItemBlock(ItemBlock {
            kind,
            items: leftovers,
        }));
    }

    Ok(MergedDocument {
        title: document.title.clone(),
        preamble: document.preamble.clone(),
        nodes,
        withheld,
    })
}
