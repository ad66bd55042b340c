use serde::{Deserialize, Serialize};

use crate::merged::MergedDocument;

/// Why a merged document should not be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The item pool was empty after validation.
    EmptyPool,
    /// Items existed but none ended up rendered.
    NothingPlaced,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptyPool => "no valid items in the pool",
            Self::NothingPlaced => "no items were rendered into the document",
        }
    }
}

/// Publish readiness of a merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeStatus {
    Ready,
    Skipped { reason: SkipReason },
}

impl MergeStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Counters describing a merge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub sections: usize,
    /// Items handed to the optimizer.
    pub items: usize,
    /// Items placed directly after sections.
    pub assigned: usize,
    /// Assigned items moved into empty sections by rebalancing.
    pub redistributed: usize,
    /// Items rendered in the fallback or standalone block.
    pub fallback: usize,
    /// Fallback items beyond the display cap.
    pub withheld: usize,
    /// Records rejected before reaching the optimizer.
    pub dropped: usize,
}

/// Outcome of a merge run, threaded back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub document: MergedDocument,
    pub stats: MergeStats,
    pub status: MergeStatus,
}

impl MergeResult {
    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }
}
