//! `.vscode/c_cpp_properties.json`, the IntelliSense configuration each
//! loaded target is mirrored into.
//!
//! The file is shared with other tooling.  Updates read the whole document,
//! patch the configuration whose `name` matches and write everything back.
//! Configurations and top-level keys we do not own are carried through
//! untouched.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, UvprojError};
use crate::host::FileSystem;

pub const FILE_NAME: &str = "c_cpp_properties.json";

const VERSION: u32 = 4;
const DEFAULT_INTELLISENSE_MODE: &str = "${default}";

/// One entry of `configurations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(rename = "includePath", default)]
    pub include_path: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(rename = "intelliSenseMode", default = "default_intellisense_mode")]
    pub intellisense_mode: String,
}

fn default_intellisense_mode() -> String {
    DEFAULT_INTELLISENSE_MODE.to_string()
}

impl Configuration {
    pub fn new(name: impl Into<String>, include_path: Vec<String>, defines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            include_path,
            defines,
            intellisense_mode: default_intellisense_mode(),
        }
    }
}

/// The whole document.  Configurations stay as raw JSON so foreign entries
/// survive a rewrite byte for byte (modulo formatting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CppProperties {
    #[serde(default)]
    pub configurations: Vec<Value>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn default_version() -> u32 {
    VERSION
}

impl Default for CppProperties {
    fn default() -> Self {
        Self {
            configurations: Vec::new(),
            version: VERSION,
            extra: IndexMap::new(),
        }
    }
}

impl CppProperties {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.configurations
            .iter()
            .position(|c| c.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Typed view of the configuration called `name`.
    pub fn configuration(&self, name: &str) -> Option<Configuration> {
        let raw = self.configurations.get(self.position(name)?)?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Replace `includePath` and `defines` of the configuration called
    /// `config.name`, or append the whole configuration.  Every other key of
    /// an existing entry (`intelliSenseMode`, `compilerPath`, ...) is kept.
    pub fn upsert(&mut self, config: &Configuration) {
        let Ok(Value::Object(mut fields)) = serde_json::to_value(config) else {
            return;
        };

        match self.position(&config.name) {
            Some(idx) => match &mut self.configurations[idx] {
                Value::Object(existing) => {
                    for key in ["includePath", "defines"] {
                        if let Some(value) = fields.remove(key) {
                            existing.insert(key.to_string(), value);
                        }
                    }
                }
                other => *other = Value::Object(fields),
            },
            None => self.configurations.push(Value::Object(fields)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Persistence
// ═══════════════════════════════════════════════════════════════════════════════

/// Read the document at `path`.  A missing, unreadable or unparsable file
/// yields a fresh default document.
pub fn read(fs: &dyn FileSystem, path: &Path) -> CppProperties {
    if !fs.is_file(path) {
        debug!(path = %path.display(), "no c_cpp_properties.json yet");
        return CppProperties::default();
    }

    let parsed = fs
        .read(path)
        .map_err(|e| e.to_string())
        .and_then(|text| CppProperties::from_json(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(props) => props,
        Err(reason) => {
            let err = UvprojError::PersistenceWriteFailed {
                path: path.to_path_buf(),
                reason,
            };
            warn!(%err, "starting from an empty configuration file");
            CppProperties::default()
        }
    }
}

pub fn write(fs: &dyn FileSystem, path: &Path, props: &CppProperties) -> Result<()> {
    let failed = |reason: String| UvprojError::PersistenceWriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(dir) = path.parent() {
        fs.create_dir_all(dir).map_err(|e| failed(e.to_string()))?;
    }
    let text = props.to_json().map_err(|e| failed(e.to_string()))?;
    fs.write(path, &text).map_err(|e| failed(e.to_string()))
}

/// Read, patch `config` in, write back.
pub fn update(fs: &dyn FileSystem, path: &Path, config: &Configuration) -> Result<()> {
    let mut props = read(fs, path);
    props.upsert(config);
    write(fs, path, &props)
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
