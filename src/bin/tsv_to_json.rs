use std::path::PathBuf;

use armortools::stats::{self, DEFAULT_JSON_OUTPUT, DEFAULT_SIGNS, DEFAULT_TSV};
use clap::Parser;
use env_logger::Env;
use log::error;

#[derive(Parser, Debug)]
#[command(version)]
/// Rebuild armor stats JSON from an edited stats table.
struct Cli {
    /// The table to read
    #[arg(short = 'i', value_name = "TSV", default_value = DEFAULT_TSV)]
    input: PathBuf,

    /// The path which the JSON will be written to
    #[arg(short = 'o', value_name = "JSON", default_value = DEFAULT_JSON_OUTPUT)]
    output: PathBuf,

    /// The player stat signs saved by json_to_tsv. Every stat is positive if this is missing.
    #[arg(short = 's', value_name = "FILE", default_value = DEFAULT_SIGNS)]
    signs: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = stats::tsv_to_json(&cli.input, &cli.signs, &cli.output) {
        error!("{e}");

        error_exit();
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
