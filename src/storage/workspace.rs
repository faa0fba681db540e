//! Working directory layout and persistence
//!
//! All artifacts live directly in the working directory under fixed names.
//! Running two provisioners against the same directory is unsupported; the
//! [`RunLock`] turns that into an immediate error instead of interleaved
//! files.

use crate::token::TokenMetadata;
use fslock::LockFile;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Execution log written by the provisioner
pub const LOG_FILE: &str = "creation_log.txt";
/// Token metadata record
pub const METADATA_FILE: &str = "token_metadata.json";
/// Address of the most recently created mint
pub const MINT_FILE: &str = "token_mint.txt";
/// Rendered report
pub const REPORT_FILE: &str = "token_report.html";
/// Marker held while a provisioner runs
pub const LOCK_FILE: &str = ".token-forge.lock";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Another run holds {0}; concurrent runs in one directory are unsupported")]
    Locked(PathBuf),
}

/// Working directory and the artifact paths inside it
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Workspace {
    /// Use `root` as the working directory, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn mint_path(&self) -> PathBuf {
        self.root.join(MINT_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Take the run lock for this directory
    pub fn lock(&self) -> Result<RunLock, StorageError> {
        RunLock::acquire(self.lock_path())
    }

    /// Write `contents` to `path` through a temporary file and rename
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Persist the metadata record as pretty JSON
    pub fn save_metadata(&self, metadata: &TokenMetadata) -> Result<PathBuf, StorageError> {
        let path = self.metadata_path();
        let data = serde_json::to_vec_pretty(metadata)?;
        self.write_atomic(&path, &data)?;
        Ok(path)
    }

    /// Load the metadata record as a typed value
    pub fn load_metadata(&self) -> Result<TokenMetadata, StorageError> {
        let data = fs::read_to_string(self.metadata_path())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Load the metadata record as raw JSON.
    ///
    /// A missing, unreadable or non-object file yields an empty object.
    pub fn load_metadata_raw(&self) -> serde_json::Map<String, serde_json::Value> {
        let path = self.metadata_path();
        if !path.exists() {
            return serde_json::Map::new();
        }

        match fs::read_to_string(&path)
            .map_err(StorageError::from)
            .and_then(|data| {
                serde_json::from_str::<serde_json::Value>(&data).map_err(StorageError::from)
            })
        {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("{} is not a JSON object, ignoring it", path.display());
                serde_json::Map::new()
            }
            Err(e) => {
                log::warn!("Error loading metadata from {}: {}", path.display(), e);
                serde_json::Map::new()
            }
        }
    }

    /// Persist the mint address
    pub fn save_mint_address(&self, mint: &str) -> Result<PathBuf, StorageError> {
        let path = self.mint_path();
        self.write_atomic(&path, mint.as_bytes())?;
        Ok(path)
    }

    /// Mint address from the last run, if any
    pub fn load_mint_address(&self) -> Option<String> {
        fs::read_to_string(self.mint_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Execution log text, if the file exists and is readable
    pub fn read_log(&self) -> Option<String> {
        let path = self.log_path();
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Error loading creation log from {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the rendered report
    pub fn save_report(&self, html: &str) -> Result<PathBuf, StorageError> {
        let path = self.report_path();
        fs::write(&path, html)?;
        Ok(path)
    }
}

/// Exclusive OS lock on the marker file for the duration of one run.
///
/// The lock belongs to the open handle, so the kernel releases it when the
/// holder exits for any reason. A marker file left behind by a killed run
/// is therefore harmless: it is simply locked again.
pub struct RunLock {
    path: PathBuf,
    file: LockFile,
}

impl RunLock {
    /// Lock the marker file without waiting, failing if another process holds it
    pub fn acquire(path: PathBuf) -> Result<Self, StorageError> {
        let mut file = LockFile::open(path.as_path())?;
        if !file.try_lock_with_pid()? {
            return Err(StorageError::Locked(path));
        }
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for RunLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLock")
            .field("path", &self.path)
            .field("held", &self.file.owns_lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Network;
    use crate::token::TokenRequest;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let temp_dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(temp_dir.path()).unwrap();
        (temp_dir, ws)
    }

    #[test]
    fn test_fixed_file_names() {
        let (dir, ws) = workspace();
        assert_eq!(ws.log_path(), dir.path().join("creation_log.txt"));
        assert_eq!(ws.metadata_path(), dir.path().join("token_metadata.json"));
        assert_eq!(ws.mint_path(), dir.path().join("token_mint.txt"));
        assert_eq!(ws.report_path(), dir.path().join("token_report.html"));
    }

    #[test]
    fn test_save_load_metadata() {
        let (_dir, ws) = workspace();
        let request = TokenRequest::new("Test", "TST", "id.json").with_decimals(4);
        let metadata = TokenMetadata::from_request(&request, "MINT", Network::Devnet);

        ws.save_metadata(&metadata).unwrap();
        let loaded = ws.load_metadata().unwrap();
        assert_eq!(loaded, metadata);

        let raw = ws.load_metadata_raw();
        assert_eq!(raw["decimals"], 4);
        assert!(!ws.metadata_path().with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_metadata_is_empty() {
        let (_dir, ws) = workspace();
        assert!(ws.load_metadata_raw().is_empty());
    }

    #[test]
    fn test_corrupt_metadata_is_empty() {
        let (_dir, ws) = workspace();
        fs::write(ws.metadata_path(), "{not json").unwrap();
        assert!(ws.load_metadata_raw().is_empty());

        fs::write(ws.metadata_path(), "[1, 2]").unwrap();
        assert!(ws.load_metadata_raw().is_empty());
    }

    #[test]
    fn test_mint_address_roundtrip() {
        let (_dir, ws) = workspace();
        assert_eq!(ws.load_mint_address(), None);
        ws.save_mint_address("So11111111111111111111111111111111111111112")
            .unwrap();
        assert_eq!(
            ws.load_mint_address().as_deref(),
            Some("So11111111111111111111111111111111111111112")
        );
    }

    #[test]
    fn test_read_log_absent() {
        let (_dir, ws) = workspace();
        assert_eq!(ws.read_log(), None);
    }

    #[test]
    fn test_lock_is_exclusive() {
        let (_dir, ws) = workspace();
        let lock = ws.lock().unwrap();
        assert!(lock.path().exists());
        assert!(matches!(ws.lock(), Err(StorageError::Locked(_))));

        drop(lock);
        assert!(ws.lock().is_ok());
    }

    #[test]
    fn test_lock_left_by_dead_run_is_reclaimed() {
        let (_dir, ws) = workspace();
        // Marker of a run that was killed before it could clean up
        fs::write(ws.lock_path(), "4194303\n").unwrap();

        let lock = ws.lock().unwrap();
        assert_eq!(
            fs::read_to_string(lock.path()).unwrap().trim(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn test_leaked_handle_keeps_lock() {
        let (_dir, ws) = workspace();
        let lock = ws.lock().unwrap();
        std::mem::forget(lock);

        // Still held by a live handle in this process
        assert!(matches!(ws.lock(), Err(StorageError::Locked(_))));
    }
}
