use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use webstore_core::{Error, Result, StorageArea};

/// Persistent area kept as a single JSON object on disk.
///
/// The whole map is loaded on open and rewritten after every mutation. Writes
/// go to a sibling temporary file first so a crash never leaves a torn file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not a storage file: {e}", path.display()),
                )
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = data.len(), "opened file storage");

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(&self.data).map_err(Error::Encode)?;
        let tmp = self.temp_path();
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Sibling of the storage file with `.tmp` appended to its full name.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Restores `key` to `previous` after a failed flush.
    fn rollback(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.data.insert(key.to_string(), value),
            None => self.data.remove(key),
        };
    }
}

impl StorageArea for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.data.insert(key.to_string(), value.to_string());

        self.flush().inspect_err(|_| self.rollback(key, previous))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.data.remove(key) else {
            return Ok(());
        };

        self.flush().inspect_err(|_| self.rollback(key, Some(previous)))
    }

    fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.data);

        self.flush().inspect_err(|_| self.data = previous)
    }
}
