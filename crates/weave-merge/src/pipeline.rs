//! End-to-end merge run: assign, merge, summarize.

use tracing::{info, info_span};

use weave_map::AssignmentEngine;
use weave_model::{
    BlockKind, Document, Item, MergeError, MergeOptions, MergeResult, MergeStats, MergeStatus,
    MergedDocument, SkipReason, ensure_unique_ids,
};

use crate::merger::merge;

/// Runs the assignment engine and the merger over one document and item pool.
#[derive(Debug, Clone)]
pub struct MergePipeline {
    engine: AssignmentEngine,
}

impl MergePipeline {
    pub fn new(options: MergeOptions) -> Result<Self, MergeError> {
        Ok(Self {
            engine: AssignmentEngine::new(options)?,
        })
    }

    pub fn options(&self) -> &MergeOptions {
        self.engine.options()
    }

    /// Merges `items` into `document`.
    ///
    /// `dropped` is the number of records rejected before the pool was built;
    /// it is carried into the stats only. Every item id in `items` must be
    /// unique.
    pub fn run(
        &self,
        document: &Document,
        items: &[Item],
        dropped: usize,
    ) -> Result<MergeResult, MergeError> {
        let span = info_span!(
            "merge",
            sections = document.sections.len(),
            items = items.len()
        );
        let _guard = span.enter();

        ensure_unique_ids(items)?;
        let assignment = self.engine.assign(&document.sections, items);
        let merged = merge(document, items, &assignment, self.engine.options())?;

        let stats = MergeStats {
            sections: document.sections.len(),
            items: items.len(),
            assigned: related_count(&merged),
            redistributed: assignment.redistributed_count(),
            fallback: merged.rendered_item_count() - related_count(&merged),
            withheld: merged.withheld.len(),
            dropped,
        };
        let status = if items.is_empty() {
            MergeStatus::Skipped {
                reason: SkipReason::EmptyPool,
            }
        } else if merged.rendered_item_count() == 0 {
            MergeStatus::Skipped {
                reason: SkipReason::NothingPlaced,
            }
        } else {
            MergeStatus::Ready
        };
        info!(
            assigned = stats.assigned,
            redistributed = stats.redistributed,
            fallback = stats.fallback,
            withheld = stats.withheld,
            dropped = stats.dropped,
            ready = status.is_ready(),
            "merge complete"
        );

        Ok(MergeResult {
            document: merged,
            stats,
            status,
        })
    }
}

fn related_count(merged: &MergedDocument) -> usize {
    merged
        .blocks()
        .filter(|block| matches!(block.kind, BlockKind::Related { .. }))
        .map(|block| block.items.len())
        .sum()
}
