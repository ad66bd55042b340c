//! `weave.toml` configuration.
//!
//! Every section and key is optional. Precedence is CLI flag, then file
//! value, then built-in default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use weave_ingest::IngestOptions;
use weave_model::{MergeError, MergeOptions};
use weave_report::{OutputOptions, RenderOptions};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "weave.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("invalid merge settings in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: MergeError,
    },
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub merge: MergeOptions,
    pub ingest: IngestSettings,
    pub render: RenderOptions,
    pub output: OutputSettings,
}

/// `[ingest]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Prefix for site-relative item URLs.
    pub base_url: Option<String>,
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub output_dir: PathBuf,
    /// Publish-ready copy directory. Empty string disables the copy.
    pub publish_dir: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("merged_html"),
            publish_dir: Some(PathBuf::from("posting")),
        }
    }
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub capacity: Option<usize>,
    pub fallback_cap: Option<usize>,
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub publish_dir: Option<PathBuf>,
    pub no_publish: bool,
}

impl WeaveConfig {
    /// Loads `explicit` if given, otherwise `weave.toml` in `dir` when present,
    /// otherwise defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::load_from(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        config
            .merge
            .validate()
            .map_err(|source| ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.normalized())
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(capacity) = overrides.capacity {
            self.merge = self.merge.with_capacity(capacity);
        }
        if let Some(fallback_cap) = overrides.fallback_cap {
            self.merge = self.merge.with_fallback_cap(fallback_cap);
        }
        if let Some(base_url) = &overrides.base_url {
            self.ingest.base_url = Some(base_url.clone());
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.output_dir = dir.clone();
        }
        if let Some(dir) = &overrides.publish_dir {
            self.output.publish_dir = Some(dir.clone());
        }
        if overrides.no_publish {
            self.output.publish_dir = None;
        }
        self.normalized()
    }

    pub fn ingest_options(&self) -> IngestOptions {
        match &self.ingest.base_url {
            Some(base_url) => IngestOptions::new().with_base_url(base_url.as_str()),
            None => IngestOptions::new(),
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        let options = OutputOptions::new(&self.output.output_dir);
        match &self.output.publish_dir {
            Some(dir) => options.with_publish_dir(dir),
            None => options,
        }
    }

    fn normalized(mut self) -> Self {
        if self
            .output
            .publish_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.output.publish_dir = None;
        }
        self
    }
}
