//! Log output to both console and a log file, with millisecond timestamps.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::paths;

const LOG_FILE: &str = "combat_bars.log";

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. If the log file cannot be
/// opened, output goes to stdout only.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = ChronoLocal::new("%H:%M:%S%.3f".to_string());

    let log_path = paths::get_logs_dir().join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(false);

    let installed = match file {
        Ok(file) => builder
            .with_ansi(false)
            .with_writer(std::io::stdout.and(Mutex::new(file)))
            .try_init(),
        Err(e) => {
            eprintln!("Could not open {}: {}", log_path.display(), e);
            builder.try_init()
        }
    };

    if installed.is_err() {
        eprintln!("A tracing subscriber was already installed");
    }
}
