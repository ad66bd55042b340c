//! The merged document tree handed to the serializer.

use serde::{Deserialize, Serialize};

use crate::document::Section;
use crate::ids::{ItemId, SectionId};
use crate::item::Item;

/// Where an item block sits and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    /// Items matched to the section immediately before the block.
    Related { section_id: SectionId },
    /// Items that did not fit any section, after the last section.
    Fallback,
    /// All items of a document that has no sections.
    Standalone,
}

/// An injected group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBlock {
    #[serde(flatten)]
    pub kind: BlockKind,
    pub items: Vec<Item>,
}

/// A node of the merged document, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Section(Section),
    ItemBlock(ItemBlock),
}

/// Original sections in order, with item blocks injected after them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedDocument {
    pub title: Option<String>,
    pub preamble: String,
    pub nodes: Vec<Node>,
    /// Fallback items beyond the display cap. Accounted for, not rendered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withheld: Vec<ItemId>,
}

impl MergedDocument {
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Section(section) => Some(section),
            Node::ItemBlock(_) => None,
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ItemBlock> {
        self.nodes.iter().filter_map(|node| match node {
            Node::ItemBlock(block) => Some(block),
            Node::Section(_) => None,
        })
    }

    /// Number of items rendered across all blocks.
    pub fn rendered_item_count(&self) -> usize {
        self.blocks().map(|block| block.items.len()).sum()
    }

    /// Ids of every item the document accounts for, rendered or withheld.
    pub fn item_ids(&self) -> Vec<&ItemId> {
        self.blocks()
            .flat_map(|block| block.items.iter().map(|item| &item.id))
            .chain(self.withheld.iter())
            .collect()
    }
}
