//! Output file naming and writing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, warn};

use weave_model::MergeResult;

use crate::html::{RenderOptions, render_html};
use crate::json::render_json;

/// Rendered output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Where rendered output goes.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    /// Directory of the publish-ready copy. `None` disables the copy.
    pub publish_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl OutputOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            publish_dir: None,
            format: OutputFormat::Html,
        }
    }

    pub fn with_publish_dir(mut self, publish_dir: impl Into<PathBuf>) -> Self {
        self.publish_dir = Some(publish_dir.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub primary: PathBuf,
    pub publish: Option<PathBuf>,
}

/// Keyword used in output names: the document file stem up to the first `_`.
pub fn document_keyword(document_path: &Path) -> String {
    let stem = document_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let keyword = stem.split('_').next().unwrap_or_default().trim();
    if keyword.is_empty() {
        "document".to_string()
    } else {
        keyword.to_string()
    }
}

/// Builds `merged_{keyword}_{YYYYmmdd_HHMMSS}.{ext}`.
pub fn output_file_name(document_path: &Path, format: OutputFormat, at: DateTime<Local>) -> String {
    format!(
        "merged_{}_{}.{}",
        document_keyword(document_path),
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Renders `result` in the requested format.
pub fn render(result: &MergeResult, format: OutputFormat, options: &RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Html => render_html(&result.document, options),
        OutputFormat::Json => render_json(result),
    }
}

/// Writes the primary output and, for ready results, a byte-identical
/// publish copy.
pub fn write_outputs(
    result: &MergeResult,
    rendered: &str,
    file_name: &str,
    options: &OutputOptions,
) -> Result<WrittenOutputs> {
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("create {}", options.output_dir.display()))?;
    let primary = options.output_dir.join(file_name);
    fs::write(&primary, rendered).with_context(|| format!("write {}", primary.display()))?;
    info!(path = %primary.display(), bytes = rendered.len(), "output written");

    let publish = match (&options.publish_dir, result.is_ready()) {
        (Some(dir), true) => {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
            let target = dir.join(file_name);
            fs::copy(&primary, &target).with_context(|| {
                format!("copy {} to {}", primary.display(), target.display())
            })?;
            info!(path = %target.display(), "publish copy written");
            Some(target)
        }
        (Some(_), false) => {
            warn!(status = ?result.status, "merge not ready, publish copy skipped");
            None
        }
        (None, _) => None,
    };

    Ok(WrittenOutputs { primary, publish })
}
