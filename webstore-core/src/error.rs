#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    #[error("Storage access denied: {0}")]
    AccessDenied(String),

    #[error("Storage area unavailable: {0}")]
    Unavailable(String),

    #[error("Host storage error: {0}")]
    Host(String),

    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode value: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn quota_exceeded<S: Into<String>>(key: S) -> Self {
        Self::QuotaExceeded { key: key.into() }
    }

    /// Maps a DOM exception raised by a browser storage area for `key`.
    pub fn from_dom_exception(name: &str, message: String, key: &str) -> Self {
        match name {
            "QuotaExceededError" => Error::quota_exceeded(key),
            "SecurityError" => Error::AccessDenied(message),
            _ => Error::Host(message),
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::QuotaExceeded { .. })
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_exception() {
        let err = Error::from_dom_exception("QuotaExceededError", "full".into(), "form");
        assert!(matches!(err, Error::QuotaExceeded { ref key } if key == "form"));
        assert!(err.is_quota_exceeded());

        let err = Error::from_dom_exception("SecurityError", "denied by policy".into(), "form");
        assert!(matches!(err, Error::AccessDenied(ref message) if message == "denied by policy"));

        let err = Error::from_dom_exception("InvalidStateError", "detached".into(), "form");
        assert!(matches!(err, Error::Host(ref message) if message == "detached"));
    }
}
