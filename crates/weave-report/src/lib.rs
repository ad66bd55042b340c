//! Rendering and output for merged documents.
//!
//! - **HTML**: a standalone page with product cards after their sections
//! - **JSON**: the merge result as data, for downstream tooling
//! - **Output**: `merged_{keyword}_{timestamp}` files plus a publish-ready copy

mod common;
mod html;
mod json;
mod output;

pub use common::format_price;
pub use html::{DEFAULT_PLACEHOLDER_IMAGE, RenderOptions, render_html};
pub use json::render_json;
pub use output::{
    OutputFormat, OutputOptions, WrittenOutputs, document_keyword, output_file_name, render,
    write_outputs,
};
