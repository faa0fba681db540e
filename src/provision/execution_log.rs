//! Execution log
//!
//! Plain-text, append-only record of one provisioning run. The file is
//! truncated when a run starts and every entry is flushed as soon as it is
//! written, so the log is complete up to the point where a run stopped.

use crate::core::Network;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Final entry of a successful run; the report looks for it
pub const COMPLETION_MESSAGE: &str = "Token creation completed successfully!";

const RULE_WIDTH: usize = 50;

/// Timestamped log file
#[derive(Debug)]
pub struct ExecutionLog {
    path: PathBuf,
    file: File,
}

impl ExecutionLog {
    /// Truncate `path` and write the run header
    pub fn create(path: &Path, network: Network) -> io::Result<Self> {
        let mut file = File::create(path)?;
        writeln!(file, "Token Creation Log - {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "Network: {}", network)?;
        writeln!(file, "{}\n", "=".repeat(RULE_WIDTH))?;
        file.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Open `path` for appending, creating it if absent
    pub fn append_to(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an informational entry
    pub fn record(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{}", message);
        self.append(message);
    }

    /// Append an entry for something that went wrong but did not stop the run
    pub fn warn(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::warn!("{}", message);
        self.append(message);
    }

    fn append(&mut self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let result = writeln!(self.file, "[{}] {}", timestamp, message).and_then(|_| self.file.flush());

        // Losing a log line must not abort a run that already touched the chain
        if let Err(e) = result {
            log::error!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creation_log.txt");

        let mut log = ExecutionLog::create(&path, Network::Mainnet).unwrap();
        log.record("first");
        log.warn("second");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Token Creation Log - "));
        assert_eq!(lines[1], "Network: mainnet");
        assert_eq!(lines[2], "=".repeat(50));
        assert!(lines[4].starts_with('[') && lines[4].ends_with("] first"));
        assert!(lines[5].ends_with("] second"));
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creation_log.txt");

        ExecutionLog::create(&path, Network::Devnet)
            .unwrap()
            .record("old run");
        ExecutionLog::create(&path, Network::Devnet)
            .unwrap()
            .record("new run");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("old run"));
        assert!(text.contains("new run"));
    }

    #[test]
    fn test_append_keeps_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creation_log.txt");

        ExecutionLog::create(&path, Network::Devnet)
            .unwrap()
            .record("created");
        ExecutionLog::append_to(&path).unwrap().record("follow-up");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("created"));
        assert!(text.contains("follow-up"));
    }
}
