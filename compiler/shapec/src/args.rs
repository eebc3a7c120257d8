//! Option parsing for `shapec check`.

use std::path::PathBuf;

use crate::CheckConfig;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing shape name")]
    MissingShape,

    #[error("no files to check")]
    MissingFiles,

    #[error("invalid --max-depth value `{value}` (expected a positive integer)")]
    BadDepth { value: String },

    #[error("unknown option `{flag}`")]
    UnknownFlag { flag: String },
}

/// Parse the arguments following `check`.
///
/// The first positional argument is the shape, the rest are files. Flags may
/// appear anywhere.
pub fn parse_check_args(args: &[String]) -> Result<CheckConfig, UsageError> {
    let mut config = CheckConfig::default();
    let mut shape = None;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--max-depth=") {
            config.max_depth = match value.parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(UsageError::BadDepth {
                        value: value.to_owned(),
                    })
                }
            };
        } else if arg == "--no-parallel" {
            config.parallel = false;
        } else if arg == "--quiet" || arg == "-q" {
            config.quiet = true;
        } else if arg == "--json" {
            config.json = true;
        } else if arg.starts_with('-') {
            return Err(UsageError::UnknownFlag { flag: arg.clone() });
        } else if shape.is_none() {
            shape = Some(arg.clone());
        } else {
            config.files.push(PathBuf::from(arg));
        }
    }

    config.shape = shape.ok_or(UsageError::MissingShape)?;
    if config.files.is_empty() {
        return Err(UsageError::MissingFiles);
    }
    Ok(config)
}

#[cfg(test)]
mod tests;
