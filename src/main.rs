use std::process::ExitCode;

use clap::Parser;
use waypath::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = waypath::init_logging(cli.log_level.as_deref()) {
        eprintln!("Failed to initialise logging: {e:#}");
    }

    match waypath::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
