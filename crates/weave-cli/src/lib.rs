//! CLI library components for `weave`.

pub mod config;
pub mod logging;
pub mod pipeline;
