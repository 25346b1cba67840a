use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use shared_config::AppConfig;

/// Patient soft deletions.
pub const DELETION: &str = "audit::deletion";
/// Appointment cancellations.
pub const CANCELLATION: &str = "audit::cancellation";

pub const DELETION_LOG_FILE: &str = "softDeletePatients.log";
pub const CANCELLATION_LOG_FILE: &str = "appointmentCancellations.log";

const DEFAULT_FILTER: &str = "info,tower_http=debug";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open audit log: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Audit file for one day. Rolled over on the first write of a new UTC day.
struct DailyFile {
    date: NaiveDate,
    writer: LineWriter<File>,
}

/// Shared handle to a daily-rolled, append-only audit file.
///
/// `softDeletePatients.log` is written as `softDeletePatients20250101.log` and so on.
#[derive(Clone)]
pub struct AuditWriter {
    dir: PathBuf,
    file_name: String,
    file: Arc<Mutex<DailyFile>>,
}

/// `name.ext` in `dir`, with the date stamped between stem and extension.
pub fn dated_path(dir: &Path, file_name: &str, date: NaiveDate) -> PathBuf {
    let stamp = date.format("%Y%m%d");
    let dated = match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}{}.{}", stem, stamp, ext),
        None => format!("{}{}", file_name, stamp),
    };
    dir.join(dated)
}

fn open_append(path: &Path) -> io::Result<LineWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineWriter::new(file))
}

impl AuditWriter {
    pub fn open(dir: &Path, file_name: &str) -> io::Result<Self> {
        Self::open_on(dir, file_name, Utc::now().date_naive())
    }

    fn open_on(dir: &Path, file_name: &str, date: NaiveDate) -> io::Result<Self> {
        let writer = open_append(&dated_path(dir, file_name, date))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            file: Arc::new(Mutex::new(DailyFile { date, writer })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, DailyFile> {
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Locks the file for `date`, switching to a new file when the day changed.
    fn lock_for(&self, date: NaiveDate) -> MutexGuard<'_, DailyFile> {
        let mut current = self.lock();
        if current.date != date {
            match open_append(&dated_path(&self.dir, &self.file_name, date)) {
                Ok(writer) => {
                    let _ = current.writer.flush();
                    *current = DailyFile { date, writer };
                }
                // Stays on the previous day's file.
                Err(e) => eprintln!("Failed to roll audit log {}: {}", self.file_name, e),
            }
        }
        current
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().writer.flush()
    }
}

pub struct AuditWriterGuard<'a>(MutexGuard<'a, DailyFile>);

impl Write for AuditWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.writer.flush()
    }
}

impl<'a> MakeWriter<'a> for AuditWriter {
    type Writer = AuditWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        AuditWriterGuard(self.lock_for(Utc::now().date_naive()))
    }
}

/// Keeps the audit files reachable so they can be flushed on shutdown.
pub struct LoggingHandle {
    writers: Vec<AuditWriter>,
}

impl LoggingHandle {
    pub fn flush(&self) {
        for writer in &self.writers {
            if let Err(e) = writer.flush() {
                eprintln!("Failed to flush audit log: {}", e);
            }
        }
    }
}

/// A plain-text layer that only records events emitted with `target`.
pub fn audit_layer<S, W>(target: &'static str, writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .with_filter(filter_fn(move |metadata| metadata.target() == target))
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(config: &AppConfig) -> Result<LoggingHandle, LoggingError> {
    fs::create_dir_all(&config.log_dir)?;

    let deletions = AuditWriter::open(&config.log_dir, DELETION_LOG_FILE)?;
    let cancellations = AuditWriter::open(&config.log_dir, CANCELLATION_LOG_FILE)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(console_filter()))
        .with(audit_layer(DELETION, deletions.clone()))
        .with(audit_layer(CANCELLATION, cancellations.clone()))
        .try_init()?;

    Ok(LoggingHandle {
        writers: vec![deletions, cancellations],
    })
}
