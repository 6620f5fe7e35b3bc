//! Logging setup
//!
//! Everything goes through `tracing`:
//! - a JSON file layer on a daily rolling appender under `<data_dir>/logs`
//! - the `tracing-log` bridge so library `log::` macros are captured
//!
//! Nothing is written to stdout: the TUI owns the terminal. Rolled files
//! from previous days are gzipped in the background.
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

const LOG_FILE: &str = "fundraiser.log";

/// Where log files live for a given data directory.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn prepare_dir(log_dir: &Path) {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }
}

/// Install `layer` as the global subscriber.
fn install<L>(layer: L) -> Result<(), TryInitError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(layer).try_init()
}

fn bridge_log_crate() {
    // The registry may already have installed the bridge.
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("LogTracer already installed: {e}");
    }
}

fn spawn_compression(log_dir: PathBuf) {
    std::thread::spawn(move || compress_old_logs(&log_dir));
}

/// Initialize logging for TUI mode: file only, nothing on the terminal.
///
/// Call before the terminal enters raw mode: setup failures go to stderr.
/// Keep the returned guard alive for the whole run so buffered lines are
/// flushed on shutdown.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    let log_dir = log_dir(data_dir);
    prepare_dir(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());

    if let Err(e) = install(file_layer) {
        eprintln!("File logging disabled: {e}");
    }
    bridge_log_crate();
    spawn_compression(log_dir);

    guard
}

/// Whether `name` is a finished rolling log that should be gzipped.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.strip_prefix(LOG_FILE)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| !date.is_empty() && date != today_suffix && !date.ends_with(".gz"))
}

fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_path = path.as_os_str().to_os_string();
    gz_path.push(".gz");
    let gz_path = PathBuf::from(gz_path);
    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}
