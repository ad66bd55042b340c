//! Relevance scoring and section assignment.
//!
//! [`tokenize`] turns text into word sets, [`score`] compares an item title
//! with a section, and [`AssignmentEngine`] places a whole item pool under
//! a per-section capacity.

#![deny(unsafe_code)]

mod engine;
mod score;
mod tokenize;

pub use engine::{AssignmentEngine, ItemScores, ScoreMatrix};
pub use score::{BestMatch, SectionIndex, score, score_tokens};
pub use tokenize::tokenize;
