use barway_cli::{init_tracing, run, Cli, LogConfig};
use clap::Parser;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("{e:#}");
        std::process::exit(2);
    }

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
