#![deny(unsafe_code)]

pub mod merger;
pub mod pipeline;

pub use merger::merge;
pub use pipeline::MergePipeline;
