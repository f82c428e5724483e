use clap::Parser;
use vcfstats_stream::{cli, commands};

fn main() {
    let args = cli::Args::parse();

    if let Err(e) = commands::stats::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
