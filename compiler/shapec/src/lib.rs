//! Shape validator driver.
//!
//! The binary is a thin argument parser over these functions; everything it
//! does is reachable from here so integration tests can drive it without a
//! subprocess.

mod args;
mod check;
mod logging;
mod warm;

pub use args::{parse_check_args, UsageError};
pub use check::{check_files, run_check, CheckConfig, CheckSummary, FileReport, Outcome};
pub use logging::init_tracing;
pub use warm::warm;
