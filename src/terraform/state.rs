//! Local state file.
//!
//! Mirrors the tfstate v4 layout so that the file can be inspected with the
//! same tooling: a top-level `version`/`serial` pair and a list of resources,
//! each holding one or more instances with their attribute bag.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const STATE_VERSION: u32 = 4;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state file '{path}' is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported state version {found} (expected 4)")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub serial: u64,
    #[serde(default)]
    pub resources: Vec<ResourceState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub mode: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub name: String,
    #[serde(default)]
    pub instances: Vec<ResourceInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    pub schema_version: u32,
    pub attributes: Map<String, Value>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            serial: 0,
            resources: Vec::new(),
        }
    }
}

impl StateFile {
    /// Loads state from disk. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let state: StateFile = serde_json::from_str(&raw).map_err(|source| StateError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        if state.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
            });
        }

        Ok(state)
    }

    /// Bumps the serial and writes the state via a sibling temp file so a
    /// crash never leaves a truncated state behind.
    pub fn save(&mut self, path: &Path) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: path.display().to_string(),
            source,
        };

        self.serial += 1;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_string_pretty(self).map_err(|source| StateError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        let tmp = path.with_extension("tfstate.tmp");
        std::fs::write(&tmp, body).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        tracing::debug!(path = %path.display(), serial = self.serial, "state saved");
        Ok(())
    }

    pub fn instance(&self, type_: &str, name: &str) -> Option<&ResourceInstance> {
        self.resources
            .iter()
            .find(|r| r.type_ == type_ && r.name == name)
            .and_then(|r| r.instances.first())
    }

    pub fn upsert_instance(&mut self, type_: &str, name: &str, attributes: Map<String, Value>) {
        let instance = ResourceInstance {
            schema_version: 0,
            attributes,
        };

        match self
            .resources
            .iter_mut()
            .find(|r| r.type_ == type_ && r.name == name)
        {
            Some(resource) => resource.instances = vec![instance],
            None => self.resources.push(ResourceState {
                mode: "managed".to_string(),
                type_: type_.to_string(),
                name: name.to_string(),
                instances: vec![instance],
            }),
        }
    }

    /// Returns true when an instance was removed.
    pub fn remove_instance(&mut self, type_: &str, name: &str) -> bool {
        let before = self.resources.len();
        self.resources.retain(|r| !(r.type_ == type_ && r.name == name));
        self.resources.len() != before
    }
}
