//! CLI command handlers, one file per subcommand.

mod batch;
mod list;
mod manifest;
mod session;

pub use batch::run_batch;
pub use list::run_list;
pub use manifest::run_manifest;
