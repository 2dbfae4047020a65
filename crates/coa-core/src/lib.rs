//! COA synthesis command-line core.
//!
//! Library half of the `coa-core` binary: exit codes, the CLI error type,
//! structured logging and snapshot input handling. Document assembly lives
//! in `coa-report`.

pub mod error;
pub mod exit_codes;
pub mod input;
pub mod logging;

pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
