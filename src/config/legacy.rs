//! config::legacy
//!
//! Read-only support for the JSON config file of earlier releases.
//!
//! The file is a JSON object that may carry `base_url` and `token`. It is
//! only consulted as the last credential source. A missing, unreadable or
//! malformed file, or one whose top-level value is not an object, is
//! treated as absent.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Credentials found in a legacy config file.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LegacyConfig {
    /// File the values were read from.
    pub path: PathBuf,
    pub base_url: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for LegacyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyConfig")
            .field("path", &self.path)
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl LegacyConfig {
    /// Load the first path holding a non-empty JSON object.
    pub fn load_first(paths: &[PathBuf]) -> Option<Self> {
        paths.iter().find_map(|path| {
            let object = read_object(path)?;
            if object.is_empty() {
                return None;
            }
            Some(Self {
                path: path.clone(),
                base_url: string_field(&object, "base_url"),
                token: string_field(&object, "token"),
            })
        })
    }
}

fn read_object(path: &Path) -> Option<Map<String, Value>> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&content).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, name: &str) -> Option<String> {
    object
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
