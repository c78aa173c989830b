use webstore_core::{MemoryStorage, WebStorage};

use crate::file_storage::FileStorage;
use crate::settings::Settings;

pub mod file_storage;
pub mod settings;
pub mod shell;

pub type HostStorage = WebStorage<MemoryStorage, FileStorage>;

/// Opens the host storage pair: an in-memory session area and the
/// file-backed persistent area named in the settings.
pub fn open_storage(settings: &Settings) -> webstore_core::Result<HostStorage> {
    let session = match settings.storage.quota {
        Some(quota) => MemoryStorage::with_quota(quota),
        None => MemoryStorage::new(),
    };
    let persistent = FileStorage::open(&settings.storage.path)?;

    tracing::info!(path = %persistent.path().display(), "persistent storage ready");

    Ok(WebStorage::new(session, persistent))
}
