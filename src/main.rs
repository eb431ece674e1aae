use std::io;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use startup_probe::SystemReport;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let platform = startup_probe::platform();
    let report = SystemReport::collect(&platform);

    if let Err(error) = report.write_to(&mut io::stdout().lock()) {
        debug!(%error, "report write failed");
    }
}
