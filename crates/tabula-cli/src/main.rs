//! `tabula`: page through CSV tables from the terminal.

use clap::Parser;
use tabula_cli::commands::{run_columns, run_view};
use tabula_cli::logging::init_logging;

mod cli;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::View(args) => run_view(
            &args.source.csv,
            args.source.config.as_deref(),
            &args.query(),
        ),
        Command::Columns(args) => run_columns(&args.source.csv, args.source.config.as_deref()),
    };
    let exit_code = match result {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
