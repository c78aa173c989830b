use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::storage::{Area, MemoryStorage, StorageArea};
use crate::value::{Encoded, Fetched, encode};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
use crate::storage::BrowserStorage;

/// JSON-aware front over a session area and a persistent area.
///
/// Arrays and objects are written as JSON text, every other value in its
/// literal string form. Reads decode JSON when they can and hand back the
/// stored text otherwise. Calls without an explicit [`Area`] target the
/// persistent area.
pub struct WebStorage<S, P = S> {
    session: S,
    persistent: P,
}

impl<S, P> WebStorage<S, P>
where
    S: StorageArea,
    P: StorageArea,
{
    pub fn new(session: S, persistent: P) -> Self {
        Self { session, persistent }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn persistent(&self) -> &P {
        &self.persistent
    }

    pub fn get(&self, key: &str) -> Result<Option<Fetched>> {
        self.get_in(key, Area::Persistent)
    }

    /// Reads `key` from the selected area. `Ok(None)` means no entry exists.
    pub fn get_in(&self, key: &str, area: impl Into<Area>) -> Result<Option<Fetched>> {
        let area = area.into();
        let raw = self.resolve(area).get_item(key)?;

        let fetched = raw.map(Fetched::decode);
        if let Some(Fetched::Raw(_)) = &fetched {
            tracing::trace!(key, ?area, "stored text is not JSON, returning it verbatim");
        }

        Ok(fetched)
    }

    /// Reads `key` and deserializes it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, area: impl Into<Area>) -> Result<Option<T>> {
        self.get_in(key, area)?
            .map(Fetched::deserialize)
            .transpose()
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        self.set_in(key, value, Area::Persistent)
    }

    /// Writes `value` under `key` in the selected area. Errors raised by the
    /// area itself, such as an exceeded quota, are returned as they are.
    pub fn set_in<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        area: impl Into<Area>,
    ) -> Result<()> {
        let area = area.into();
        let encoded = encode(value)?;

        tracing::debug!(
            key,
            ?area,
            structured = matches!(encoded, Encoded::Structured(_)),
            "set item"
        );

        self.resolve_mut(area).set_item(key, encoded.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_in(key, Area::Persistent)
    }

    pub fn remove_in(&mut self, key: &str, area: impl Into<Area>) -> Result<()> {
        let area = area.into();
        tracing::debug!(key, ?area, "remove item");

        self.resolve_mut(area).remove_item(key)
    }

    /// Empties both areas, including entries this facade never wrote.
    pub fn clear(&mut self) -> Result<()> {
        tracing::debug!("clear session and persistent areas");

        self.session.clear()?;
        self.persistent.clear()
    }

    fn resolve(&self, area: Area) -> &dyn StorageArea {
        match area {
            Area::Session => &self.session,
            Area::Persistent => &self.persistent,
        }
    }

    fn resolve_mut(&mut self, area: Area) -> &mut dyn StorageArea {
        match area {
            Area::Session => &mut self.session,
            Area::Persistent => &mut self.persistent,
        }
    }
}

impl WebStorage<MemoryStorage> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), MemoryStorage::new())
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl WebStorage<BrowserStorage> {
    /// Binds to `window.sessionStorage` and `window.localStorage`.
    pub fn browser() -> Result<Self> {
        Ok(Self::new(BrowserStorage::session()?, BrowserStorage::local()?))
    }
}
