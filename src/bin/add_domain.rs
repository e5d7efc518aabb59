use armortools::domains::{self, DEFAULT_DOMAIN, DEFAULT_PATTERN, DEFAULT_PREFIXES};
use clap::Parser;
use env_logger::Env;
use log::error;

#[derive(Parser, Debug)]
#[command(version)]
/// Prefix bare block, item and entity paths in shape files with an asset domain.
///
/// Files are rewritten in place. There is no backup.
struct Cli {
    /// Glob patterns for the folders to rewrite. Every file below a matching folder is processed.
    #[arg(value_name = "PATTERN", default_value = DEFAULT_PATTERN)]
    patterns: Vec<String>,

    /// The domain to add
    #[arg(short = 'd', long, default_value = DEFAULT_DOMAIN)]
    domain: String,

    /// The path prefixes which get the domain
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX", default_values = DEFAULT_PREFIXES)]
    prefixes: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = domains::add_domain(&cli.patterns, &cli.domain, &cli.prefixes) {
        error!("{e}");

        error_exit();
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
