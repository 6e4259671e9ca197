//! CLI front end: `legalease --example_id N` runs a built-in analysis
//! program against its data folder and prints the residual policy of its
//! return value.

mod programs;
mod registry;

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use legalease_error::LegaleaseResult;

/// Static residual-policy analyzer for Legalease-governed tabular pipelines.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// The example program ID to analyze.
    #[arg(long, default_value_t = 0)]
    example_id: u32,
}

fn analyze(args: &Args) -> LegaleaseResult<()> {
    let root = std::env::var("PRIVGUARD").map_err(|_| {
        legalease_error::LegaleaseError::IoError(std::io::Error::new(
            ErrorKind::NotFound,
            "PRIVGUARD environment variable is not set",
        ))
    })?;

    let example = registry::lookup(args.example_id).ok_or_else(|| {
        legalease_error::legalease_err!(ParseError: "no example registered for --example_id {}", args.example_id)
    })?;

    let data_folder = PathBuf::from(&root).join(example.data_folder);
    tracing::info!("running example {} ({}) against {}", example.id, example.name, data_folder.display());

    let residual = (example.run)(&data_folder)?;
    println!("\nResidual policy of the output:\n{residual}");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    match analyze(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}
