//! Signal K delta documents

use enginebay_core::Value;
use serde::Serialize;

/// Context of every delta produced on board
pub const SELF_CONTEXT: &str = "vessels.self";

/// Top-level delta document
#[derive(Debug, Serialize)]
pub struct Delta<'a> {
    pub context: &'a str,
    pub updates: Vec<Update<'a>>,
}

/// One update block; all values share a source
#[derive(Debug, Serialize)]
pub struct Update<'a> {
    pub source: Source<'a>,
    pub values: Vec<PathValue<'a>>,
}

/// Device that produced the values
#[derive(Debug, Serialize)]
pub struct Source<'a> {
    pub label: &'a str,
}

/// A value under its semantic path
#[derive(Debug, Serialize)]
pub struct PathValue<'a> {
    pub path: &'a str,
    pub value: &'a Value,
}

/// Builds deltas labelled with this device's name
#[derive(Debug, Clone)]
pub struct DeltaEncoder {
    label: String,
}

impl DeltaEncoder {
    /// Encoder for the device called `label` (usually the hostname)
    pub fn new(label: &str) -> Self {
        Self { label: label.to_string() }
    }

    /// Source label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Delta carrying one value
    pub fn delta<'a>(&'a self, path: &'a str, value: &'a Value) -> Delta<'a> {
        self.batch(&[(path, value)])
    }

    /// Delta carrying several values in one update
    pub fn batch<'a>(&'a self, values: &[(&'a str, &'a Value)]) -> Delta<'a> {
        Delta {
            context: SELF_CONTEXT,
            updates: vec![Update {
                source: Source { label: &self.label },
                values: values.iter().map(|&(path, value)| PathValue { path, value }).collect(),
            }],
        }
    }

    /// Serialized single-value delta
    pub fn encode(&self, path: &str, value: &Value) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.delta(path, value))
    }
}
