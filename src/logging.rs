use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: console output on stderr plus, when
/// `log_file` is given, the same events appended to that file without colours.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file, open_error) = match log_file.map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let (Some(path), Some(e)) = (log_file, open_error) {
        warn!("Logging to console only, cannot open {}: {}", path.display(), e);
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
