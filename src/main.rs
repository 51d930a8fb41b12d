//! flatdupe - deduplicate by content, then flatten
//!
//! Entry point for the flatdupe CLI application.

use clap::error::ErrorKind;
use clap::Parser;
use flatdupe::{cli::Cli, error::ExitCode};

fn main() {
    // Parse command-line arguments; argument errors exit with 1, not clap's 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::GeneralError,
            };
            // Usage errors go to stdout like every other diagnostic
            print!("{}", err.render());
            std::process::exit(code.as_i32());
        }
    };

    // Run the application logic
    match flatdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);
            println!("[{}] ERROR: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
