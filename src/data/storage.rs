//! JSON document storage for the tuning dataset, with timestamped backups.
//!
//! On-disk layout inside the data directory:
//! - `supreme-tuning.json`: the live dataset
//! - `backups/backup-<utc timestamp>-<seq>.json`: immutable snapshots
//!
//! Every sequence that snapshots and then replaces the live document runs
//! under one write lock. Reads take no lock; the live document is only ever
//! swapped in by rename, so a reader sees either the old or the new version.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::models::{BackupInfo, Database};
use super::validate::validate_database;
use crate::{Error, Result};

/// File name of the live dataset inside the data directory
pub const DATASET_FILE: &str = "supreme-tuning.json";

/// Directory holding backups, relative to the data directory
pub const BACKUP_DIR: &str = "backups";

/// Storage for the dataset document and its backups
#[derive(Debug)]
pub struct DatasetStore {
    dataset_path: PathBuf,
    backup_dir: PathBuf,
    writer: Mutex<()>,
}

impl DatasetStore {
    /// Open the store rooted at a data directory. Nothing is touched on disk
    /// until the first operation.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self::with_paths(data_dir.join(DATASET_FILE), data_dir.join(BACKUP_DIR))
    }

    /// Open a store with an explicit dataset file and backup directory
    pub fn with_paths(dataset_path: PathBuf, backup_dir: PathBuf) -> Self {
        DatasetStore {
            dataset_path,
            backup_dir,
            writer: Mutex::new(()),
        }
    }

    /// Path of the live dataset document
    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Directory backups are written to
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded state lives on disk, so a panicked holder leaves nothing
        // half-updated in memory.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the current dataset, creating and persisting an empty one if
    /// none exists yet.
    pub fn read(&self) -> Result<Database> {
        if let Some(db) = load_document(&self.dataset_path)? {
            return Ok(db);
        }
        let _guard = self.lock();
        self.read_locked()
    }

    fn read_locked(&self) -> Result<Database> {
        match load_document(&self.dataset_path)? {
            Some(db) => Ok(db),
            None => {
                debug!(path = ?self.dataset_path, "No dataset found, initialising empty one");
                let db = Database::default();
                write_atomic(&self.dataset_path, &db)?;
                Ok(db)
            }
        }
    }

    /// Replace the live dataset in full. No backup is taken; see
    /// [`DatasetStore::replace_dataset`] for the guarded save.
    pub fn write(&self, db: &Database) -> Result<()> {
        validate_database(db)?;
        let _guard = self.lock();
        write_atomic(&self.dataset_path, db)
    }

    /// Snapshot the current dataset into a new backup and return its id
    pub fn create_backup(&self) -> Result<String> {
        let _guard = self.lock();
        self.backup_locked()
    }

    fn backup_locked(&self) -> Result<String> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            Error::storage(format!("Failed to create backup directory {:?}", self.backup_dir), e)
        })?;

        let current = self.read_locked()?;
        let json = to_json(&current)?;
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%6f").to_string();

        // Staged under a name listings skip, then linked to its final id
        let staging = self.backup_dir.join(format!(".backup-{stamp}.tmp"));
        write_synced(&staging, json.as_bytes())?;
        let published = self.publish_backup(&staging, &stamp);
        if let Err(e) = fs::remove_file(&staging) {
            warn!(path = ?staging, error = %e, "Failed to remove staged backup");
        }

        let id = published?;
        info!(backup = %id, "Backup created");
        Ok(id)
    }

    /// Link a fully written snapshot to the first free backup id
    fn publish_backup(&self, staging: &Path, stamp: &str) -> Result<String> {
        let mut seq = 0u32;
        loop {
            let id = format!("backup-{stamp}-{seq:03}.json");
            let path = self.backup_dir.join(&id);
            match fs::hard_link(staging, &path) {
                Ok(()) => return Ok(id),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => seq += 1,
                Err(e) => {
                    return Err(Error::storage(format!("Failed to create backup {path:?}"), e))
                }
            }
        }
    }

    /// Back up the current dataset, then replace it. Returns the backup id.
    ///
    /// Validation happens before anything is written, so a rejected dataset
    /// leaves both the live document and the backup directory untouched.
    pub fn replace_dataset(&self, db: &Database) -> Result<String> {
        validate_database(db)?;
        let _guard = self.lock();
        let backup = self.backup_locked()?;
        write_atomic(&self.dataset_path, db)?;
        info!(backup = %backup, brands = db.brands.len(), "Dataset replaced");
        Ok(backup)
    }

    /// List backups, most recently modified first
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::storage(
                    format!("Failed to read backup directory {:?}", self.backup_dir),
                    e,
                ))
            }
        };

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match backup_info(id, &path) {
                Ok(info) => backups.push(info),
                Err(e) => warn!(backup = %id, error = %e, "Skipping unreadable backup"),
            }
        }

        backups.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(backups)
    }

    /// Load the dataset stored in a backup
    pub fn read_backup(&self, id: &str) -> Result<Database> {
        let path = self.backup_path(id)?;
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(Error::BackupNotFound(id.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::BackupNotFound(id.to_string()))
            }
            Err(e) => return Err(Error::storage(format!("Failed to stat {path:?}"), e)),
        }
        load_document(&path)?.ok_or_else(|| Error::BackupNotFound(id.to_string()))
    }

    /// Replace the live dataset with a backup's content. The pre-restore
    /// dataset is backed up first, and that new backup's id is returned.
    pub fn restore_from_backup(&self, id: &str) -> Result<String> {
        let _guard = self.lock();
        let restored = self.read_backup(id)?;
        let safety = self.backup_locked()?;
        write_atomic(&self.dataset_path, &restored)?;
        info!(backup = %id, safety_backup = %safety, "Dataset restored from backup");
        Ok(safety)
    }

    fn backup_path(&self, id: &str) -> Result<PathBuf> {
        if !id.ends_with(".json") || id.contains(['/', '\\']) || id.contains("..") {
            return Err(Error::Validation(format!("Invalid backup id: {id:?}")));
        }
        Ok(self.backup_dir.join(id))
    }
}

/// Read and parse a dataset document; `None` if the file does not exist
fn load_document(path: &Path) -> Result<Option<Database>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::storage(format!("Failed to read {path:?}"), e)),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| Error::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn to_json(db: &Database) -> Result<String> {
    serde_json::to_string_pretty(db)
        .map_err(|e| Error::storage("Failed to serialize dataset", e.into()))
}

/// Write via a sibling temp file and rename over the target
fn write_atomic(path: &Path, db: &Database) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::storage(format!("Failed to create directory {parent:?}"), e))?;
    }

    let json = to_json(db)?;
    let tmp = path.with_extension("json.tmp");
    write_synced(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)
        .map_err(|e| Error::storage(format!("Failed to replace {path:?}"), e))?;

    debug!(path = ?path, "Dataset written");
    Ok(())
}

/// Create `path`, write `bytes` and flush them to disk. A failed write
/// removes the partial file.
fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let written = File::create(path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(Error::storage(format!("Failed to write {path:?}"), e));
    }
    Ok(())
}

/// Metadata for a backup file; fails if the file is not a readable dataset
fn backup_info(id: &str, path: &Path) -> io::Result<BackupInfo> {
    let meta = fs::metadata(path)?;
    serde_json::from_slice::<Database>(&fs::read(path)?).map_err(io::Error::from)?;
    let modified = meta.modified()?;
    // Birth time is not available on every filesystem
    let created = meta.created().unwrap_or(modified);
    Ok(BackupInfo {
        id: id.to_string(),
        size: meta.len(),
        created_at: to_utc(created),
        modified_at: to_utc(modified),
    })
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
