mod cli;

use crate::cli::CliCommand;

fn main() {
    // Parse CLI, load config, set up logging, dispatch.
    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("sigcheck error: {:#}", err);
        std::process::exit(1);
    }
}
