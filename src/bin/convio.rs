use std::env;

use convio::ConvertBuilder;
use convio::cli::{Invocation, parse_args, usage};
use convio::error::{ConvertError, EXIT_FAILURE};
use convio::format::default_registry;

fn run(args: Vec<String>) -> Result<(), ConvertError> {
    let config = match parse_args(&args)? {
        Invocation::Help => {
            print!("{}", usage());
            std::process::exit(EXIT_FAILURE);
        }
        Invocation::Convert(config) => config,
    };

    let summary = ConvertBuilder::from_config(config, default_registry()).run()?;
    tracing::debug!(records = summary.records, "done");
    Ok(())
}

fn main() {
    // Logs go to stderr; stdout may be carrying converted records.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print!("{}", usage());
        std::process::exit(EXIT_FAILURE);
    }

    if let Err(e) = run(args) {
        eprintln!("{e}");
        if let ConvertError::Config(config) = &e {
            if config.is_incomplete() {
                print!("{}", usage());
            }
        }
        std::process::exit(e.exit_code());
    }
}
