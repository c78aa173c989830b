use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/default.toml"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    /// File backing the persistent area.
    pub path: String,
    /// Byte limit for the session area.
    pub quota: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub storage: Storage,
}

impl Settings {
    /// Loads `config` if given, else the file named by `WEBSTORE_CONFIG`,
    /// else the built-in defaults.
    pub fn new(config: Option<&Path>) -> anyhow::Result<Self> {
        let path = config
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("WEBSTORE_CONFIG").map(PathBuf::from));

        let mut settings = match path {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::parse(DEFAULT_CONFIG)?,
        };

        settings.storage.path = Self::normalize_path(&settings.storage.path)?
            .to_string_lossy()
            .to_string();

        Ok(settings)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path_buf = PathBuf::from(path);

        Ok(if path_buf.is_absolute() {
            path_buf
        } else {
            env::current_dir()?.join(path_buf)
        })
    }
}
