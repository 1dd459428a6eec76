//! Config document and apply report

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use enginebay_core::{ConfigError, ConfigRegistry, ConfigResult, ParamValue};
use serde::{Deserialize, Serialize};

use crate::validation::{validate_param, ValidationIssue};
use crate::{ConfigFileError, Result};

/// Parameters keyed by config path, then by parameter key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    entries: BTreeMap<String, BTreeMap<String, ParamValue>>,
}

impl ConfigDocument {
    /// Empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every exposed path of `registry`
    pub fn capture(registry: &ConfigRegistry) -> ConfigResult<Self> {
        let mut document = Self::new();
        for item in registry.items() {
            for (key, value) in registry.params(&item.path)? {
                document.set(&item.path, key, value);
            }
        }
        Ok(document)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document = Self::from_json(&json)?;

        let issues = document.validate();
        if !issues.is_empty() {
            return Err(ConfigFileError::Invalid(issues));
        }
        log::info!("loaded {} config path(s) from {}", document.len(), path.display());
        Ok(document)
    }

    /// Write the document to disk as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| ConfigFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("saved {} config path(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Insert or replace one parameter
    pub fn set(&mut self, path: &str, key: &str, value: ParamValue) {
        self.entries
            .entry(path.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// One parameter, if present
    pub fn get(&self, path: &str, key: &str) -> Option<&ParamValue> {
        self.entries.get(path)?.get(key)
    }

    /// Drop every parameter under `path`
    pub fn remove_path(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Config paths in lexical order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every `(path, key, value)` triple
    pub fn params(&self) -> impl Iterator<Item = (&str, &str, &ParamValue)> {
        self.entries.iter().flat_map(|(path, params)| {
            params
                .iter()
                .map(move |(key, value)| (path.as_str(), key.as_str(), value))
        })
    }

    /// Number of config paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the document holds no paths
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the offline checks on every parameter
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.params()
            .filter_map(|(path, key, value)| validate_param(path, key, value).err())
            .collect()
    }

    /// Push every parameter into `registry`
    ///
    /// Never stops early. Each rejected value is logged and reported, and
    /// the node keeps its previous value for that key.
    pub fn apply(&self, registry: &mut ConfigRegistry) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (path, key, value) in self.params() {
            match registry.get(path, key) {
                Ok(current) if current == *value => {
                    report.unchanged += 1;
                    continue;
                }
                Err(ConfigError::UnknownPath(_)) => {
                    if !report.unknown_paths.iter().any(|p| p == path) {
                        log::warn!("config path {} is not exposed by this pipeline", path);
                        report.unknown_paths.push(path.to_string());
                    }
                    continue;
                }
                _ => {}
            }

            match registry.set(path, key, value) {
                Ok(()) => report.applied += 1,
                Err(error) => {
                    log::warn!("config {} {} rejected: {}", path, key, error);
                    report.rejected.push(Rejection {
                        path: path.to_string(),
                        key: key.to_string(),
                        error,
                    });
                }
            }
        }

        log::info!(
            "config applied: {} changed, {} unchanged, {} rejected, {} unknown path(s)",
            report.applied,
            report.unchanged,
            report.rejected.len(),
            report.unknown_paths.len()
        );
        report
    }
}

/// A parameter the registry refused
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Config path
    pub path: String,
    /// Parameter key
    pub key: String,
    /// Why the node refused it
    pub error: ConfigError,
}

/// Outcome of [`ConfigDocument::apply`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    /// Parameters that changed
    pub applied: usize,
    /// Parameters already at the document's value
    pub unchanged: usize,
    /// Parameters the node refused
    pub rejected: Vec<Rejection>,
    /// Document paths with no exposed node
    pub unknown_paths: Vec<String>,
}

impl ApplyReport {
    /// Check if every parameter in the document was accepted
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.unknown_paths.is_empty()
    }
}
