mod memory;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod browser;

pub use memory::*;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use browser::*;

use crate::error::Result;

/// Which of the two storage areas an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Area {
    /// Lives as long as the current browsing context (or host session).
    Session,
    /// Survives until explicitly cleared or evicted by the host.
    #[default]
    Persistent,
}

impl From<bool> for Area {
    /// `true` selects the session area, `false` the persistent one.
    fn from(use_session: bool) -> Self {
        if use_session {
            Area::Session
        } else {
            Area::Persistent
        }
    }
}

/// String to string key-value store owned by the host environment.
///
/// The area stores raw strings only. Encoding structured values is the
/// facade's job, so implementations stay free of any serialization concern.
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}
