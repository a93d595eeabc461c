//! Main application entry point.

use std::process::ExitCode;

use clap::Parser;
use kerf_app::Cli;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match kerf_app::run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
