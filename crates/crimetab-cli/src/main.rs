mod cli;
mod pipeline;
mod shared;
mod workbook;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use pipeline::InputNotFound;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crimetab=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    if !cli.no_listing {
        match std::env::current_dir() {
            Ok(dir) => println!("Current working directory: {}", dir.display()),
            Err(error) => tracing::warn!(%error, "could not resolve working directory"),
        }
        shared::print_listing("before");
    }

    // Failures are reported on stdout; the run itself still ends normally.
    if let Err(error) = pipeline::run(&cli) {
        match error.downcast_ref::<InputNotFound>() {
            Some(InputNotFound(path)) => {
                println!("Error: The file '{}' was not found.", path.display());
            }
            None => println!("An unexpected error occurred: {error:#}"),
        }
    }
    ExitCode::SUCCESS
}
