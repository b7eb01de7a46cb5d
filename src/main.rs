//! `stowy` binary: parse arguments, install logging and run the command.
use std::process::ExitCode;

use clap::Parser;

use stowy::cli::Cli;
use stowy::commands;
use stowy::logging::{self, Log, Logger};

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init_subscriber(args.verbosity());
    let log = Logger::new();
    log.trace(&format!("Received args: {args:?}"));

    match commands::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(1)
        }
    }
}
