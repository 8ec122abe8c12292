use std::process::ExitCode;

use casework::{cli::build_cli, CliError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    match casework::cli::handlers::dispatch(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map_or(2, CliError::exit_code);
            if !matches!(err.downcast_ref::<CliError>(), Some(CliError::InvalidCase { .. })) {
                eprintln!("Error: {err:#}");
            }
            ExitCode::from(code)
        }
    }
}
