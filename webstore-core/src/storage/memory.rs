use std::collections::BTreeMap;

use super::StorageArea;
use crate::error::{Error, Result};

/// In-process storage area.
///
/// With a quota set, a write that would push the total size of keys and
/// values past it is rejected and leaves the area untouched.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            data: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes currently occupied by keys and values.
    pub fn usage(&self) -> usize {
        self.data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageArea for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let replaced = self.data.get(key).map_or(0, |old| key.len() + old.len());
            let required = self.usage() - replaced + key.len() + value.len();
            if required > quota {
                return Err(Error::quota_exceeded(key));
            }
        }

        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.data.clear();
        Ok(())
    }
}
