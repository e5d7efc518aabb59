use std::path::PathBuf;

use armortools::stats::{self, DEFAULT_JSON_INPUT, DEFAULT_SIGNS, DEFAULT_TSV};
use clap::Parser;
use env_logger::Env;
use log::error;

#[derive(Parser, Debug)]
#[command(version)]
/// Flatten armor stats JSON into a tab-separated table for editing in a spreadsheet.
struct Cli {
    /// The armor stats JSON to read
    #[arg(short = 'i', value_name = "JSON", default_value = DEFAULT_JSON_INPUT)]
    input: PathBuf,

    /// The path which the table will be written to
    #[arg(short = 'o', value_name = "TSV", default_value = DEFAULT_TSV)]
    output: PathBuf,

    /// The path which the player stat signs will be written to
    #[arg(short = 's', value_name = "FILE", default_value = DEFAULT_SIGNS)]
    signs: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = stats::json_to_tsv(&cli.input, &cli.output, &cli.signs) {
        error!("{e}");

        error_exit();
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
