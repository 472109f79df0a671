//! Atomic TOML file operations.
//!
//! Writes go through a temp file in the same directory followed by a rename,
//! so readers only ever see a complete previous or complete new document.

use domino_core::DominoError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Errors that can occur while reading or writing a TOML document.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    Io(std::io::Error),
    /// Document exists but is not valid for the expected type.
    Parse(toml::de::Error),
    /// Value could not be rendered as TOML.
    Serialize(toml::ser::Error),
    /// Lock file could not be acquired.
    Lock(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {}", e),
            StorageError::Parse(e) => write!(f, "TOML parse error: {}", e),
            StorageError::Serialize(e) => write!(f, "TOML serialization error: {}", e),
            StorageError::Lock(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// True when the file was readable but its content was not.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Parse(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<toml::de::Error> for StorageError {
    fn from(e: toml::de::Error) -> Self {
        StorageError::Parse(e)
    }
}

impl From<toml::ser::Error> for StorageError {
    fn from(e: toml::ser::Error) -> Self {
        StorageError::Serialize(e)
    }
}

impl From<StorageError> for DominoError {
    fn from(e: StorageError) -> Self {
        DominoError::persistence(e.to_string())
    }
}

/// A handle to one TOML document on disk.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: loaded
    /// - `Ok(None)`: file missing or blank
    /// - `Err`: unreadable or unparseable
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Replaces the document with `data`.
    pub fn save(&self, data: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Deletes the document. A missing file is not an error.
    pub fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `on_corrupt` decides what happens when the current document cannot be
    /// parsed: `Some(value)` moves the unreadable file to a `.corrupt` sibling
    /// and starts over from `value`, `None` aborts with the parse error.
    pub fn update<F>(&self, default_value: T, on_corrupt: Option<T>, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(loaded) => loaded.unwrap_or(default_value),
            Err(e) if e.is_corrupt() => match on_corrupt {
                Some(replacement) => {
                    let backup = self.backup_corrupt()?;
                    tracing::warn!(
                        "Moved unreadable {:?} to {:?}: {}",
                        self.path,
                        backup,
                        e
                    );
                    replacement
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        };

        f(&mut data);
        self.save(&data)
    }

    /// Renames the current file to the first free `<name>.corrupt[.N]` path.
    fn backup_corrupt(&self) -> Result<PathBuf, StorageError> {
        let file_name = self.file_name()?;
        let backup = (0u32..)
            .map(|n| match n {
                0 => self.path.with_file_name(format!("{}.corrupt", file_name)),
                n => self.path.with_file_name(format!("{}.corrupt.{}", file_name, n)),
            })
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "No free backup name",
                ))
            })?;

        fs::rename(&self.path, &backup)?;
        Ok(backup)
    }

    fn file_name(&self) -> Result<String, StorageError> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Path has no file name",
                ))
            })
    }

    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let parent = self.path.parent().ok_or_else(|| {
            StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        Ok(parent.join(format!(".{}.tmp", self.file_name()?)))
    }
}

/// Exclusive lock held for the duration of an update.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| StorageError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.lock_path);
    }
}
