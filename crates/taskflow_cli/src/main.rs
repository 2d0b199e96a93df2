//! CLI entry point for taskflow boards.

mod cli;
mod commands;
mod output;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = commands::handle(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
