//! CLI command handlers. Each command is in its own file.

mod checksum;
mod list;
mod run;
mod try_extractor;

pub use checksum::run_checksum;
pub use list::run_list;
#[cfg(test)]
pub(crate) use run::{failure_mode, select};
pub use run::run_batch;
pub use try_extractor::run_try;
