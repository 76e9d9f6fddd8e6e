use clap::Parser;
use plexsync_core::logging;

mod cli;

use crate::cli::{exit_code, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    match cli.log_file.as_deref() {
        Some(path) => {
            if let Err(err) = logging::init_logging_to_file(path) {
                logging::init_logging();
                tracing::warn!("falling back to stdout logging: {:#}", err);
            }
        }
        None => logging::init_logging(),
    }

    if let Err(err) = cli.run() {
        eprintln!("plexsync error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}
