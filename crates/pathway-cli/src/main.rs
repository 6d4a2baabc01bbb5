use std::process::ExitCode;

use clap::Parser;
use pathway_cli::{CliArgs, PathwayCli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let cli = match PathwayCli::from_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
