//! Configuration options for a merge run.

use serde::{Deserialize, Serialize};

use crate::error::MergeError;

/// Default number of items placed directly after one section.
pub const DEFAULT_CAPACITY: usize = 2;

/// Default maximum number of items shown in a fallback or standalone block.
pub const DEFAULT_FALLBACK_CAP: usize = 8;

/// Options controlling assignment and merge behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Maximum items placed directly after a single section.
    pub capacity: usize,
    /// Maximum items displayed in the fallback or standalone block.
    pub fallback_cap: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            fallback_cap: DEFAULT_FALLBACK_CAP,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_fallback_cap(mut self, fallback_cap: usize) -> Self {
        self.fallback_cap = fallback_cap;
        self
    }

    /// Rejects option values that indicate a caller bug.
    pub fn validate(&self) -> Result<(), MergeError> {
        if self.capacity == 0 {
            return Err(MergeError::InvalidCapacity(self.capacity));
        }
        if self.fallback_cap == 0 {
            return Err(MergeError::InvalidFallbackCap(self.fallback_cap));
        }
        Ok(())
    }
}
