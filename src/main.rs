//! ghsecrets - Manage encrypted GitHub Actions secrets.

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ghsecrets::cli::{self, Cli};
use ghsecrets::ui::output;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("GHSECRETS_LOG").unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("ghsecrets=debug")
        } else {
            EnvFilter::new("ghsecrets=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(format!("{:#}", e));
            if let Some(hint) = cli::hint_for(&e) {
                output::hint(hint);
            }
            ExitCode::FAILURE
        }
    }
}
