//! Assignment engine implementation.
//!
//! Items are matched to sections in three passes:
//!
//! 1. **Best match**: every item goes to its highest scoring section. Items
//!    with no overlap anywhere are held back as unassigned.
//! 2. **Capacity**: sections over capacity keep their top scoring items; the
//!    rest become overflow.
//! 3. **Redistribution**: overflow then unassigned items are spread in
//!    contiguous chunks over sections that received nothing. Whatever is left
//!    forms the fallback group.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use weave_model::{
    Assignment, Item, ItemId, MergeError, MergeOptions, Placement, PlacementOrigin, Section,
    SectionId,
};

use crate::score::SectionIndex;
use crate::tokenize::tokenize;

/// An item matched to a section during the first pass.
#[derive(Debug, Clone)]
struct Candidate {
    item_id: ItemId,
    score: f64,
}

/// Engine assigning pool items to document sections.
///
/// The engine is deterministic: identical sections and items always produce
/// an identical [`Assignment`].
///
/// # Example
///
/// ```ignore
/// use weave_map::AssignmentEngine;
/// use weave_model::MergeOptions;
///
/// let engine = AssignmentEngine::new(MergeOptions::default())?;
/// let assignment = engine.assign(&document.sections, &items);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    options: MergeOptions,
}

impl AssignmentEngine {
    /// Creates an engine, rejecting invalid options.
    pub fn new(options: MergeOptions) -> Result<Self, MergeError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Assigns every item to a section or to the fallback group.
    ///
    /// Never fails on degenerate input: no sections sends every item to the
    /// fallback group, no items yields an empty assignment.
    pub fn assign(&self, sections: &[Section], items: &[Item]) -> Assignment {
        let capacity = self.options.capacity;
        let index = SectionIndex::new(sections);
        let section_ids: Vec<SectionId> = index.section_ids().cloned().collect();

        // Phase 1: best match.
        let mut buckets: Vec<Vec<Candidate>> = vec![Vec::new(); index.len()];
        let mut unassigned: Vec<Candidate> = Vec::new();
        for item in items {
            let tokens = tokenize(&item.title);
            match index.best_match(&tokens) {
                Some(best) => buckets[best.position].push(Candidate {
                    item_id: item.id.clone(),
                    score: best.score,
                }),
                None => unassigned.push(Candidate {
                    item_id: item.id.clone(),
                    score: 0.0,
                }),
            }
        }
        debug!(
            sections = index.len(),
            items = items.len(),
            matched = items.len() - unassigned.len(),
            unassigned = unassigned.len(),
            "best-match pass complete"
        );

        // Phase 2: capacity.
        let mut overflow: Vec<Candidate> = Vec::new();
        for bucket in &mut buckets {
            if bucket.len() <= capacity {
                continue;
            }
            bucket.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            overflow.extend(bucket.split_off(capacity));
        }
        debug!(overflow = overflow.len(), capacity, "capacity pass complete");

        // Phase 3: redistribution.
        let mut pool = overflow;
        pool.extend(unassigned);
        let empty_positions: Vec<usize> = buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.is_empty())
            .map(|(position, _)| position)
            .collect();
        let mut redistributed: Vec<(usize, Vec<Candidate>)> = Vec::new();
        let mut consumed = 0;
        if !empty_positions.is_empty() && !pool.is_empty() {
            let per_section = chunk_size(pool.len(), empty_positions.len(), capacity);
            for &position in &empty_positions {
                if consumed >= pool.len() {
                    break;
                }
                let end = (consumed + per_section).min(pool.len());
                redistributed.push((position, pool[consumed..end].to_vec()));
                consumed = end;
            }
        }
        let fallback: Vec<ItemId> = pool
            .into_iter()
            .skip(consumed)
            .map(|candidate| candidate.item_id)
            .collect();
        debug!(
            empty_sections = empty_positions.len(),
            redistributed = consumed,
            fallback = fallback.len(),
            "redistribution pass complete"
        );

        let mut assignment = Assignment {
            fallback,
            ..Assignment::default()
        };
        for (position, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            assignment.placements.insert(
                section_ids[position].clone(),
                into_placements(bucket, PlacementOrigin::BestMatch),
            );
        }
        for (position, chunk) in redistributed {
            assignment.placements.insert(
                section_ids[position].clone(),
                into_placements(chunk, PlacementOrigin::Redistributed),
            );
        }
        assignment
    }

    /// Scores every item against every section without assigning anything.
    pub fn score_matrix(&self, sections: &[Section], items: &[Item]) -> ScoreMatrix {
        let index = SectionIndex::new(sections);
        let rows = items
            .iter()
            .map(|item| {
                let tokens = tokenize(&item.title);
                ItemScores {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    scores: index.scores(&tokens),
                    best: index.best_match(&tokens).map(|best| best.section_id),
                }
            })
            .collect();
        ScoreMatrix {
            section_ids: index.section_ids().cloned().collect(),
            rows,
        }
    }
}

/// Items handed to each empty section: an even share of the pool, at least
/// one, never more than the section capacity. Any remainder stays in the
/// pool and falls through to the fallback group.
fn chunk_size(pool_len: usize, empty_sections: usize, capacity: usize) -> usize {
    (pool_len / empty_sections).max(1).min(capacity)
}

fn into_placements(candidates: Vec<Candidate>, origin: PlacementOrigin) -> Vec<Placement> {
    candidates
        .into_iter()
        .map(|candidate| Placement {
            item_id: candidate.item_id,
            score: candidate.score,
            origin,
        })
        .collect()
}

/// Per-item scores against every section, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreMatrix {
    /// Column order of [`ItemScores::scores`].
    pub section_ids: Vec<SectionId>,
    pub rows: Vec<ItemScores>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemScores {
    pub item_id: ItemId,
    pub title: String,
    pub scores: Vec<f64>,
    /// Section the first pass would choose, if any score is positive.
    pub best: Option<SectionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_is_even_share_clamped_to_capacity() {
        assert_eq!(chunk_size(5, 2, 2), 2);
        assert_eq!(chunk_size(1, 3, 2), 1);
        assert_eq!(chunk_size(9, 2, 2), 2);
        assert_eq!(chunk_size(9, 2, 10), 4);
    }

    #[test]
    fn zero_capacity_is_a_caller_error() {
        let err = AssignmentEngine::new(MergeOptions::new().with_capacity(0)).unwrap_err();
        assert_eq!(err, MergeError::InvalidCapacity(0));
    }
}
