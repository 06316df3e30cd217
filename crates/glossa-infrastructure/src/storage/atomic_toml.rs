//! Atomic TOML file operations.
//!
//! Writes go through a temporary file in the same directory followed by a
//! rename, under an exclusive lock file.

use glossa_core::GlossaError;
use serde::{Serialize, de::DeserializeOwned};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for GlossaError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => e.into(),
            AtomicTomlError::Parse(e) => e.into(),
            AtomicTomlError::Serialize(e) => e.into(),
            AtomicTomlError::Lock(message) => GlossaError::io(message),
        }
    }
}

/// A TOML document on disk that is replaced atomically on save.
///
/// Files holding credentials should be opened with [`AtomicTomlFile::private`]
/// so they are created with mode 600 on Unix.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    private: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _marker: PhantomData,
        }
    }

    /// Like [`AtomicTomlFile::new`], but restricts the file to its owner.
    pub fn private(path: PathBuf) -> Self {
        Self {
            private: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document; `Ok(None)` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    /// Replaces the document with `data`.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let rendered = toml::to_string_pretty(data)?;
        let _lock = WriteLock::acquire(&self.path)?;

        let staging = sibling(&self.path, ".", ".tmp")?;
        let mut file = self.create_staging(&staging)?;
        file.write_all(rendered.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.path)?;
        tracing::debug!(path = %self.path.display(), private = self.private, "Saved TOML file");
        Ok(())
    }

    fn create_staging(&self, staging: &Path) -> std::io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            if self.private {
                options.mode(0o600);
            }
        }
        options.open(staging)
    }
}

/// `dir/<prefix><file name><suffix>` next to `path`.
fn sibling(path: &Path, prefix: &str, suffix: &str) -> std::io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
    let mut sibling_name = OsString::from(prefix);
    sibling_name.push(name);
    sibling_name.push(suffix);
    Ok(path.with_file_name(sibling_name))
}

/// Exclusive lock on `<file>.lock`, held while a save is in progress.
///
/// The lock file stays on disk so every writer locks the same inode.
struct WriteLock {
    _file: File,
}

impl WriteLock {
    fn acquire(target: &Path) -> Result<Self, AtomicTomlError> {
        if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let path = sibling(target, "", ".lock")?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| AtomicTomlError::Lock(format!("{}: {e}", path.display())))?;
        Ok(Self { _file: file })
    }
}
