use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info};

use pembundle::config::{ConverterConfig, DEFAULT_INPUT_PATH};
use pembundle::convert::Converter;
use pembundle::keystore::PemKeystoreWriter;

/// Converts a directory of PEM certificate directories into keystores and a domain map.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Print progress
    #[arg(short, long)]
    verbose: bool,

    /// Directory receiving the keystores and the domain map
    output_path: PathBuf,

    /// Directory with one subdirectory per certificate
    #[arg(default_value = DEFAULT_INPUT_PATH)]
    input_path: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if let Err(print_err) = e.print() {
                eprintln!("{e}");
                eprintln!("Failed to print usage: {print_err}");
            }
            // help and version go to stdout and are not failures
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    info!(
        "Converting certificates: {} => {}",
        args.input_path.display(),
        args.output_path.display()
    );

    let config = ConverterConfig::builder()
        .input_path(args.input_path)
        .output_path(args.output_path)
        .build();
    let mut converter = Converter::new(config);

    if let Err(e) = converter.read_certificates() {
        error!("{e}");
        error!("Error reading certificates, aborting without writing anything");
        return ExitCode::from(2);
    }

    if let Err(e) = converter.write_keystores(&PemKeystoreWriter) {
        error!("{e}");
        error!("Error writing output, aborting. Partial changes might be written already");
        return ExitCode::from(3);
    }

    ExitCode::SUCCESS
}
