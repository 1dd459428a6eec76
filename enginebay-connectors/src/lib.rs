//! Telemetry Transport for the Sink Boundary
//!
//! ## Overview
//!
//! The core pipeline ends at a [`TelemetrySink`](enginebay_core::TelemetrySink):
//! every calibrated sample leaves the graph as a `(path, value)` pair. This
//! crate turns those pairs into Signal K delta documents and hands the bytes
//! to a [`Connector`], the byte-level transport seam.
//!
//! ```text
//! SkOutput ──publish──▶ DeltaSink ──encode──▶ DeltaEncoder
//!                           │
//!                           └──send(topic, bytes)──▶ Connector (MQTT, WebSocket, serial)
//! ```
//!
//! ## Delta Format
//!
//! One delta per published value:
//!
//! ```json
//! {
//!   "context": "vessels.self",
//!   "updates": [{
//!     "source": { "label": "Oceans-Dream-Instruments" },
//!     "values": [{ "path": "propulsion.main.revolutions", "value": 18.18 }]
//!   }]
//! }
//! ```
//!
//! ## Failure Handling
//!
//! Sinks do not buffer or retry. A failed send is counted in
//! [`ConnectionStats`], logged at `warn` and the value is dropped; the next
//! sample on the same path supersedes it anyway.
//!
//! ## Example Usage
//!
//! ```rust
//! use enginebay_connectors::{DeltaEncoder, DeltaSink, MemoryConnector};
//! use enginebay_core::{TelemetrySink, Value};
//!
//! let mut sink = DeltaSink::new(DeltaEncoder::new("Oceans-Dream-Instruments"), MemoryConnector::new());
//! sink.publish("propulsion.main.revolutions", &Value::Float(18.18));
//!
//! assert_eq!(sink.stats().messages_sent, 1);
//! assert_eq!(sink.connector().sent().len(), 1);
//! ```

pub mod delta;
pub mod memory;
pub mod sink;

pub use delta::{Delta, DeltaEncoder, PathValue, Source, Update, SELF_CONTEXT};
pub use memory::MemoryConnector;
pub use sink::{DeltaSink, DEFAULT_TOPIC};

use std::fmt;

use thiserror::Error;

/// Errors raised by the bundled connectors
///
/// Transport-specific connectors bring their own `Error` type; the sink only
/// needs its `Display` text for [`ConnectionStats::last_error`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,
}

/// Byte transport behind a telemetry sink
pub trait Connector {
    type Error: fmt::Display;

    /// Send one encoded message
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginebay_core::{TelemetrySink, Value};

    #[test]
    fn test_stats_keep_error_text() {
        let mut sink = DeltaSink::new(DeltaEncoder::new("rig"), MemoryConnector::new());
        sink.connector_mut().set_connected(false);
        sink.publish("a.b", &Value::Bool(true));

        let reason = ConnectorError::NotConnected.to_string();
        assert_eq!(sink.stats().last_error.as_deref(), Some(reason.as_str()));
        assert_eq!(sink.stats().messages_failed, 1);
    }
}
