pub mod assignment;
pub mod document;
pub mod error;
pub mod ids;
pub mod item;
pub mod merged;
pub mod options;
pub mod result;

pub use assignment::{Assignment, Placement, PlacementOrigin};
pub use document::{Document, Section};
pub use error::{MergeError, ModelError, Result};
pub use ids::{ItemId, SectionId};
pub use item::{Item, ensure_unique_ids};
pub use merged::{BlockKind, ItemBlock, MergedDocument, Node};
pub use options::{DEFAULT_CAPACITY, DEFAULT_FALLBACK_CAP, MergeOptions};
pub use result::{MergeResult, MergeStats, MergeStatus, SkipReason};
