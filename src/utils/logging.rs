use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::utils::app_paths::AppPaths;

/// Appends formatted tracing output to a log file, one timestamped line per event.
/// The terminal is busy showing the table, so nothing goes to stdout or stderr.
#[derive(Clone)]
pub struct FileLogWriter {
    file: Arc<Mutex<File>>,
}

impl FileLogWriter {
    pub fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// Open (or create) `path` for appending
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl Write for FileLogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let message = String::from_utf8_lossy(buf);
        let message = message.trim_end();
        if message.is_empty() {
            return Ok(buf.len());
        }

        if let Ok(mut file) = self.file.lock() {
            let timestamp = Local::now().format("%H:%M:%S%.3f");
            writeln!(file, "[{}] {}", timestamp, message)?;
            file.flush()?; // Keep the tail intact if the process aborts
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileLogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Timestamped log file in the log directory, with a `latest.log` pointer
fn create_log_file() -> Result<(PathBuf, FileLogWriter)> {
    let log_dir = AppPaths::log_dir()?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("csv-pager_{}.log", timestamp));
    let writer = FileLogWriter::open(&log_path)?;

    let latest_path = log_dir.join("latest.log");

    #[cfg(unix)]
    {
        let _ = std::fs::remove_file(&latest_path);
        let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
    }

    #[cfg(windows)]
    {
        let pointer_content = format!("Current log file: {}\n", log_path.display());
        let _ = std::fs::write(&latest_path, pointer_content);
    }

    Ok((log_path, writer))
}

/// Initialize tracing to a log file. `RUST_LOG` overrides the default `info`
/// level. Returns the log path, or the reason logging is unavailable.
pub fn init_tracing() -> Result<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let (log_path, writer) = create_log_file()?;

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // We add our own timestamps
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(target: "system", "Logging to {}", log_path.display());
    Ok(log_path)
}
