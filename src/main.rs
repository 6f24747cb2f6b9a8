use std::process::ExitCode;

use chrono::Local;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};
use vat_rates::{info_time, process::process_site, Paths};

#[tokio::main]
async fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).init();

    let start_time = Local::now();
    match process_site(&Paths::default()).await {
        Ok(_) => {
            info_time!(start_time, "Full program time:");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Could not write files.");
            ExitCode::FAILURE
        }
    }
}
