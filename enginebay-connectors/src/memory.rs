//! In-memory connector
//!
//! Records every message instead of sending it. Used by tests and by
//! bench setups without a network.

use crate::{Connector, ConnectorError};

/// Connector that keeps sent messages in a `Vec`
#[derive(Debug)]
pub struct MemoryConnector {
    sent: Vec<(String, Vec<u8>)>,
    connected: bool,
}

impl MemoryConnector {
    /// Connected, empty recorder
    pub fn new() -> Self {
        Self { sent: Vec::new(), connected: true }
    }

    /// Simulate a link going up or down
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// `(topic, payload)` pairs in send order
    pub fn sent(&self) -> &[(String, Vec<u8>)] {
        &self.sent
    }

    /// Payloads parsed back as JSON
    pub fn json_payloads(&self) -> Vec<serde_json::Value> {
        self.sent
            .iter()
            .filter_map(|(_, payload)| serde_json::from_slice(payload).ok())
            .collect()
    }

    /// Forget recorded messages
    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MemoryConnector {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(ConnectorError::NotConnected);
        }
        self.sent.push((topic.to_string(), data.to_vec()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
