//! CLI command handlers, one per file.

mod candidates;
mod check_network;
mod run;

pub use candidates::run_candidates;
pub use check_network::run_check_network;
pub use run::run_sync;
