use std::path::Path;

use anyhow::{Context, Result};

use weave_cli::config::{ConfigOverrides, WeaveConfig};
use weave_cli::pipeline::{
    LoadedInputs, MergeRequest, MergeRun, run_merge as merge_pipeline, run_score as score_pipeline,
};
use weave_map::ScoreMatrix;
use weave_report::OutputFormat;

use crate::cli::{InputArgs, MergeArgs, OutputFormatArg};

fn load_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<WeaveConfig> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let config = WeaveConfig::discover(config_path, &cwd)?;
    Ok(config.with_overrides(overrides))
}

pub fn run_merge(args: &MergeArgs, config_path: Option<&Path>) -> Result<MergeRun> {
    let overrides = ConfigOverrides {
        capacity: args.capacity,
        fallback_cap: args.fallback_cap,
        base_url: args.input.base_url.clone(),
        output_dir: args.output_dir.clone(),
        publish_dir: args.publish_dir.clone(),
        no_publish: args.no_publish,
    };
    let config = load_config(config_path, &overrides)?;
    let request = MergeRequest {
        document: args.input.document.clone(),
        items: args.input.items.clone(),
        format: match args.format {
            OutputFormatArg::Html => OutputFormat::Html,
            OutputFormatArg::Json => OutputFormat::Json,
        },
        dry_run: args.dry_run,
    };
    merge_pipeline(&request, &config)
}

pub fn run_score(
    args: &InputArgs,
    config_path: Option<&Path>,
) -> Result<(LoadedInputs, ScoreMatrix)> {
    let overrides = ConfigOverrides {
        base_url: args.base_url.clone(),
        ..ConfigOverrides::default()
    };
    let config = load_config(config_path, &overrides)?;
    score_pipeline(&args.document, &args.items, &config)
}
