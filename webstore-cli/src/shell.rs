use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use serde_json::Value;
use webstore_core::{Area, Fetched, StorageArea, WebStorage};

const SESSION_FLAG: &str = "--session";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get { key: String, area: Area },
    Set { key: String, value: Value, area: Area },
    Remove { key: String, area: Area },
    Clear,
    Exit,
}

impl Command {
    /// Parses one shell line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();

        let command = match verb {
            "get" => {
                let (key, area) = Self::key_and_area(verb, rest)?;
                Command::Get { key, area }
            }
            "remove" => {
                let (key, area) = Self::key_and_area(verb, rest)?;
                Command::Remove { key, area }
            }
            "set" => Self::parse_set(rest)?,
            "clear" if rest.is_empty() => Command::Clear,
            "exit" | "quit" if rest.is_empty() => Command::Exit,
            "clear" | "exit" | "quit" => bail!("'{verb}' takes no arguments"),
            other => bail!("Unknown command '{other}'"),
        };

        Ok(Some(command))
    }

    fn key_and_area(verb: &str, rest: &str) -> anyhow::Result<(String, Area)> {
        let mut area = Area::Persistent;
        let mut keys = Vec::new();

        for word in rest.split_whitespace() {
            if word == SESSION_FLAG {
                area = Area::Session;
            } else {
                keys.push(word);
            }
        }

        match keys.as_slice() {
            [key] => Ok((key.to_string(), area)),
            _ => bail!("Usage: {verb} <key> [{SESSION_FLAG}]"),
        }
    }

    /// `set [--session] <key> <value...>`, the value being the rest of the line.
    fn parse_set(rest: &str) -> anyhow::Result<Self> {
        let (area, rest) = match rest.strip_prefix(SESSION_FLAG) {
            Some(after) if after.is_empty() || after.starts_with(char::is_whitespace) => {
                (Area::Session, after.trim_start())
            }
            _ => (Area::Persistent, rest),
        };

        let Some((key, text)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: set [{SESSION_FLAG}] <key> <value>");
        };
        let text = text.trim();
        if text.is_empty() {
            bail!("Usage: set [{SESSION_FLAG}] <key> <value>");
        }

        // Arrays and objects keep their shape, scalars keep the exact text typed
        let value = match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Array(_) | Value::Object(_))) => value,
            _ => Value::String(text.to_string()),
        };

        Ok(Command::Set {
            key: key.to_string(),
            value,
            area,
        })
    }
}

/// Line-oriented front end over a [`WebStorage`].
///
/// The session area lives exactly as long as the shell does.
pub struct Shell<S, P> {
    storage: WebStorage<S, P>,
}

impl<S, P> Shell<S, P>
where
    S: StorageArea,
    P: StorageArea,
{
    pub fn new(storage: WebStorage<S, P>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &WebStorage<S, P> {
        &self.storage
    }

    /// Runs commands until `exit` or end of input. Command failures are
    /// reported on `errors` and do not stop the shell.
    pub fn run<R, W, E>(&mut self, input: R, mut output: W, mut errors: E) -> anyhow::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(errors, "error: {e}")?;
                    continue;
                }
            };

            if command == Command::Exit {
                break;
            }

            match self.execute(command) {
                Ok(Some(text)) => writeln!(output, "{text}")?,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("command failed: {e}");
                    writeln!(errors, "error: {e}")?;
                }
            }
        }

        output.flush()?;
        Ok(())
    }

    /// Applies one command, returning the text to print for reads.
    pub fn execute(&mut self, command: Command) -> webstore_core::Result<Option<String>> {
        match command {
            Command::Get { key, area } => {
                let text = match self.storage.get_in(&key, area)? {
                    Some(Fetched::Json(value)) => {
                        serde_json::to_string_pretty(&value).map_err(webstore_core::Error::Encode)?
                    }
                    Some(Fetched::Raw(raw)) => raw,
                    None => "null".to_string(),
                };
                Ok(Some(text))
            }
            Command::Set { key, value, area } => {
                self.storage.set_in(&key, &value, area)?;
                Ok(None)
            }
            Command::Remove { key, area } => {
                self.storage.remove_in(&key, area)?;
                Ok(None)
            }
            Command::Clear => {
                self.storage.clear()?;
                Ok(None)
            }
            Command::Exit => Ok(None),
        }
    }
}
