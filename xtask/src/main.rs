use clap::Parser;
use std::process::ExitCode;

mod app;
mod cli;
mod config;
mod tasks;
mod util;

fn main() -> ExitCode {
    crate::util::logger::init();
    let cli = crate::cli::Cli::parse();
    match crate::app::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(crate::util::process::exit_code(&e))
        }
    }
}
