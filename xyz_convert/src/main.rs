mod cli;

use clap::Parser;
use lib_xyz::BatchReport;
use log::{error, LevelFilter};

use cli::{Cli, CliError};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    lib_xyz::init_logging(level);

    // Every outcome here ends the run normally; only clap exits non-zero.
    println!("{}", final_message(cli::run(&cli)));
}

fn final_message(result: Result<BatchReport, CliError>) -> String {
    match result {
        Ok(report) => {
            eprintln!();
            report.summary()
        }
        Err(e) => {
            error!("{e}");
            e.to_string()
        }
    }
}
