//! Local flat-file table.

use crate::error::StorageResult;
use requiva_core::{read_rows, write_csv, RawRow, RecordBatch};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A CSV table holding every record, one row per record.
///
/// The header is the canonical column list. Saving rewrites the whole file.
///
/// # Durability
///
/// A save is written to a sibling temporary file, synced, then renamed over
/// the table, so a crash mid-write leaves the previous contents in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTable {
    path: PathBuf,
}

impl LocalTable {
    /// Creates a handle for the table at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and a header-only table if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn ensure_exists(&self) -> StorageResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "creating empty order table");
        self.replace(&RecordBatch::new())
    }

    /// Reads every row with whatever header the file carries.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, opened or parsed.
    pub fn read_rows(&self) -> StorageResult<Vec<RawRow>> {
        self.ensure_exists()?;
        let file = File::open(&self.path)?;
        let rows = read_rows(BufReader::new(file))?;
        debug!(path = %self.path.display(), rows = rows.len(), "read order table");
        Ok(rows)
    }

    /// Replaces the table contents with `batch`, in batch order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or renamed.
    pub fn replace(&self, batch: &RecordBatch) -> StorageResult<()> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        write_csv(batch, &mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        self.sync_directory()?;
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "orders.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        File::open(dir)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        Ok(())
    }
}
