//! Input loading for the merge pipeline.
//!
//! This crate turns files on disk into the in-memory inputs the assignment
//! engine and merger work on.
//!
//! # Features
//!
//! - **Documents**: Markdown (ATX headings) or JSON section lists
//! - **Item pools**: JSON or CSV listings, several files concatenated in order
//! - **Validation**: malformed records are rejected with a reason, not an error
//! - **Normalization**: formatted prices and site-relative URLs
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use weave_ingest::{IngestOptions, load_document, load_items};
//!
//! let document = load_document(Path::new("notes/가전_리뷰.md"))?;
//! let pool = load_items(
//!     &[PathBuf::from("listings/page1.json")],
//!     &IngestOptions::new().with_base_url("https://www.example.com"),
//! )?;
//! ```

mod document;
mod error;
mod items;

// === Error Types ===
pub use error::{IngestError, Result};

// === Documents ===
pub use document::{load_document, parse_json_document, parse_markdown};

// === Item Pools ===
pub use items::{IngestOptions, ItemPool, RejectReason, RejectedRecord, load_items};
