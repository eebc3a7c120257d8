//! The `check` command: validate documents against one shape.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use shape_cache::Registry;
use shape_fhir::{build_by_name, CatalogError};
use shape_schema::{ProtocolViolation, Report, Schema, ValidateOptions, DEFAULT_MAX_DEPTH};
use tracing::{debug, error, warn};

/// Check command configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckConfig {
    /// Shape to validate against, e.g. `Patient` or `Bundle<Observation>`.
    pub shape: String,
    pub files: Vec<PathBuf>,
    /// Nesting limit passed to the validator.
    pub max_depth: usize,
    /// Check files concurrently.
    pub parallel: bool,
    /// Print failures and the summary line only.
    pub quiet: bool,
    /// Print the summary as JSON instead of text.
    pub json: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            shape: String::new(),
            files: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: true,
            quiet: false,
            json: false,
        }
    }
}

/// What happened to one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid { issues: Vec<String> },
    /// The file could not be checked at all.
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub shape: String,
    pub files: Vec<FileReport>,
}

impl CheckSummary {
    pub fn passed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == Outcome::Valid)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Human-readable report.
    pub fn render(&self, quiet: bool) -> String {
        let mut out = String::new();
        for file in &self.files {
            let path = file.path.display();
            match &file.outcome {
                Outcome::Valid if quiet => {}
                Outcome::Valid => {
                    let _ = writeln!(out, "OK    {path}");
                }
                Outcome::Invalid { issues } => {
                    let _ = writeln!(out, "FAIL  {path}");
                    for issue in issues {
                        let _ = writeln!(out, "      {issue}");
                    }
                }
                Outcome::Failed { error } => {
                    let _ = writeln!(out, "ERROR {path}: {error}");
                }
            }
        }
        let _ = writeln!(
            out,
            "{}: {} passed, {} failed",
            self.shape,
            self.passed(),
            self.failed()
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, thiserror::Error)]
enum FileError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("validator construction bug: {0}")]
    Protocol(#[from] ProtocolViolation),
}

/// Warm `reg`, resolve the configured shape, seal, and check every file.
///
/// Nested generic names (`BundleEntry<Bundle<Observation>>`) are outside the
/// warm-up set, so the shape is resolved before sealing.
pub fn run_check(reg: &Registry, config: &CheckConfig) -> Result<CheckSummary, CatalogError> {
    let stats = crate::warm(reg, false)?;
    debug!(%stats, "registry warm");
    let schema = build_by_name(reg, &config.shape)?;
    reg.seal();
    Ok(check_files(&schema, config))
}

/// Check every configured file against `schema`, in input order.
pub fn check_files(schema: &Schema, config: &CheckConfig) -> CheckSummary {
    let options = ValidateOptions {
        max_depth: config.max_depth,
    };
    let check = |path: &PathBuf| FileReport {
        path: path.clone(),
        outcome: check_file(schema, path, options),
    };

    let files = if config.parallel && config.files.len() > 1 {
        // Scoped pool: torn down before returning instead of at exit.
        rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| config.files.par_iter().map(check).collect::<Vec<_>>())
            })
            .unwrap_or_else(|e| {
                warn!("failed to create thread pool ({e}), checking sequentially");
                config.files.iter().map(check).collect()
            })
    } else {
        config.files.iter().map(check).collect()
    };

    CheckSummary {
        shape: config.shape.clone(),
        files,
    }
}

fn check_file(schema: &Schema, path: &Path, options: ValidateOptions) -> Outcome {
    match validate_file(schema, path, options) {
        Ok(report) if report.is_valid() => Outcome::Valid,
        Ok(report) => Outcome::Invalid {
            issues: report.issues().iter().map(ToString::to_string).collect(),
        },
        Err(err) => {
            if let FileError::Protocol(violation) = &err {
                error!(path = %path.display(), %violation, "validator construction protocol violated");
            }
            Outcome::Failed {
                error: err.to_string(),
            }
        }
    }
}

fn validate_file(schema: &Schema, path: &Path, options: ValidateOptions) -> Result<Report, FileError> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(schema.validate_with(&value, options)?)
}
