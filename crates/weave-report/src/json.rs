//! JSON rendering of a merge result.

use anyhow::{Context, Result};

use weave_model::MergeResult;

/// Serializes the merged document together with its stats and status.
pub fn render_json(result: &MergeResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result).context("serialize merge result")?;
    json.push('\n');
    Ok(json)
}
