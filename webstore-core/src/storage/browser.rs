use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use super::{Area, StorageArea};
use crate::error::{Error, Result};

/// `window.localStorage` or `window.sessionStorage`.
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn open(area: Area) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Unavailable("no global window".into()))?;

        let storage = match area {
            Area::Session => window.session_storage(),
            Area::Persistent => window.local_storage(),
        }
        .map_err(|e| map_js_error(e, ""))?
        .ok_or_else(|| Error::Unavailable(format!("{area:?} storage is disabled")))?;

        Ok(Self { storage })
    }

    pub fn local() -> Result<Self> {
        Self::open(Area::Persistent)
    }

    pub fn session() -> Result<Self> {
        Self::open(Area::Session)
    }
}

impl StorageArea for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(|e| map_js_error(e, key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(|e| map_js_error(e, key))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(|e| map_js_error(e, key))
    }

    fn clear(&mut self) -> Result<()> {
        self.storage.clear().map_err(|e| map_js_error(e, ""))
    }
}

fn map_js_error(err: JsValue, key: &str) -> Error {
    match err.dyn_ref::<DomException>() {
        Some(exception) => Error::from_dom_exception(&exception.name(), exception.message(), key),
        None => Error::Host(err.as_string().unwrap_or_else(|| format!("{err:?}"))),
    }
}
