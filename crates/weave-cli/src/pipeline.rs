//! Command pipelines shared by the binary and the integration tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info, info_span};

use weave_ingest::{ItemPool, load_document, load_items};
use weave_map::{AssignmentEngine, ScoreMatrix};
use weave_merge::MergePipeline;
use weave_model::{Document, MergeResult};
use weave_report::{OutputFormat, WrittenOutputs, output_file_name, render, write_outputs};

use crate::config::WeaveConfig;

/// Inputs of one `merge` run.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub document: PathBuf,
    pub items: Vec<PathBuf>,
    pub format: OutputFormat,
    /// Render but do not write files.
    pub dry_run: bool,
}

/// Everything a `merge` run produced.
#[derive(Debug)]
pub struct MergeRun {
    pub result: MergeResult,
    pub pool: ItemPool,
    pub file_name: String,
    pub outputs: Option<WrittenOutputs>,
    /// The document as loaded, before merging.
    pub document: Document,
}

/// Inputs loaded from disk.
#[derive(Debug)]
pub struct LoadedInputs {
    pub document: Document,
    pub pool: ItemPool,
}

pub fn load_inputs(document: &Path, items: &[PathBuf], config: &WeaveConfig) -> Result<LoadedInputs> {
    let document =
        load_document(document).with_context(|| format!("load document {}", document.display()))?;
    let pool = load_items(items, &config.ingest_options()).context("load item pool")?;
    debug!(
        sections = document.sections.len(),
        items = pool.len(),
        rejected = pool.dropped(),
        "inputs loaded"
    );
    Ok(LoadedInputs { document, pool })
}

pub fn run_merge(request: &MergeRequest, config: &WeaveConfig) -> Result<MergeRun> {
    let span = info_span!("run", document = %request.document.display());
    let _guard = span.enter();

    let LoadedInputs { document, pool } = load_inputs(&request.document, &request.items, config)?;
    let pipeline = MergePipeline::new(config.merge).context("configure merge")?;
    let result = pipeline
        .run(&document, &pool.items, pool.dropped())
        .context("merge items into document")?;

    let rendered = render(&result, request.format, &config.render)?;
    let file_name = output_file_name(&request.document, request.format, Local::now());
    let outputs = if request.dry_run {
        info!(file = %file_name, "dry run, nothing written");
        None
    } else {
        let options = config.output_options().with_format(request.format);
        Some(write_outputs(&result, &rendered, &file_name, &options)?)
    };

    Ok(MergeRun {
        result,
        pool,
        file_name,
        outputs,
        document,
    })
}

/// Scores every item against every section without assigning.
pub fn run_score(
    document: &Path,
    items: &[PathBuf],
    config: &WeaveConfig,
) -> Result<(LoadedInputs, ScoreMatrix)> {
    let inputs = load_inputs(document, items, config)?;
    let engine = AssignmentEngine::new(config.merge).context("configure scoring")?;
    let matrix = engine.score_matrix(&inputs.document.sections, &inputs.pool.items);
    Ok((inputs, matrix))
}
