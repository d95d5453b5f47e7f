//! Append-only text journal.
//!
//! One timestamped line per event, written to a plain text file. The
//! file is opened in append mode and closed on every call, so a write
//! that has started always completes before shutdown can interleave.
//! Not a structured log — diagnostics go through `tracing` instead.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::MonitorError;

/// Timestamp format used on every journal line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only journal over a fixed file path.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line `[YYYY-MM-DD HH:MM:SS] <message>` to the journal.
    /// UTF-8, create-if-missing, never truncates.
    pub fn append(&self, message: &str) -> Result<(), MonitorError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let line = format!("[{timestamp}] {message}\n");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!(path = %self.path.display(), message, "Journal line written");
        Ok(())
    }

    /// Write the startup banner: separator, symbol list, threshold.
    pub fn startup_banner(
        &self,
        symbols: &[String],
        threshold: rust_decimal::Decimal,
    ) -> Result<(), MonitorError> {
        self.append(&"=".repeat(50))?;
        self.append("股票监控程序启动")?;
        self.append(&format!("监控股票: {symbols:?}"))?;
        self.append(&format!("预警阈值: {threshold}%"))?;
        self.append(&"=".repeat(50))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
