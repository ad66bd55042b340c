use thiserror::Error;

use crate::ids::ItemId;

/// Caller errors raised by the assignment and merge core.
///
/// Degenerate data (no sections, no items, blank titles) is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),
    #[error("fallback cap must be at least 1 (got {0})")]
    InvalidFallbackCap(usize),
    #[error("assignment references unknown item: {0}")]
    UnknownItem(ItemId),
    #[error("item pool contains duplicate id: {0}")]
    DuplicateItem(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid item id: {0:?}")]
    InvalidItemId(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;
