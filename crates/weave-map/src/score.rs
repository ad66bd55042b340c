//! Keyword-overlap relevance scoring between items and sections.

use std::collections::BTreeSet;

use weave_model::{Item, Section, SectionId};

use crate::tokenize::tokenize;

/// Scores an item token set against a section token set.
///
/// `common * (1 + common / |item_tokens|)`: raw overlap, weighted up when the
/// overlap covers most of the item's own words. Empty item tokens score 0.
pub fn score_tokens(item_tokens: &BTreeSet<String>, section_tokens: &BTreeSet<String>) -> f64 {
    if item_tokens.is_empty() {
        return 0.0;
    }
    let common = item_tokens.intersection(section_tokens).count() as f64;
    let ratio = common / item_tokens.len() as f64;
    common * (1.0 + ratio)
}

/// Relevance of `item` to `section`, always `>= 0`.
pub fn score(item: &Item, section: &Section) -> f64 {
    score_tokens(&tokenize(&item.title), &tokenize(&section.scoring_text()))
}

/// Pre-tokenized sections in document order.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    entries: Vec<IndexedSection>,
}

#[derive(Debug, Clone)]
struct IndexedSection {
    id: SectionId,
    tokens: BTreeSet<String>,
}

/// Best section for an item.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Position of the section within the index (document order).
    pub position: usize,
    pub section_id: SectionId,
    pub score: f64,
}

impl SectionIndex {
    pub fn new(sections: &[Section]) -> Self {
        let mut ordered: Vec<&Section> = sections.iter().collect();
        ordered.sort_by_key(|section| section.ordinal);
        let entries = ordered
            .into_iter()
            .map(|section| IndexedSection {
                id: section.id.clone(),
                tokens: tokenize(&section.scoring_text()),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Section ids in document order.
    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    /// Scores of the item tokens against every section, in document order.
    pub fn scores(&self, item_tokens: &BTreeSet<String>) -> Vec<f64> {
        self.entries
            .iter()
            .map(|entry| score_tokens(item_tokens, &entry.tokens))
            .collect()
    }

    /// Highest scoring section; the earliest section wins ties.
    ///
    /// Returns `None` when every score is zero, so zero-overlap items are
    /// never pinned to an arbitrary section.
    pub fn best_match(&self, item_tokens: &BTreeSet<String>) -> Option<BestMatch> {
        let mut best: Option<BestMatch> = None;
        for (position, entry) in self.entries.iter().enumerate() {
            let score = score_tokens(item_tokens, &entry.tokens);
            if score <= 0.0 {
                continue;
            }
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(BestMatch {
                    position,
                    section_id: entry.id.clone(),
                    score,
                });
            }
        }
        best
    }
}
