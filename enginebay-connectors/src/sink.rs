//! Telemetry sink that ships Signal K deltas over a connector

use std::cell::RefCell;
use std::rc::Rc;

use enginebay_core::{TelemetrySink, Value};

use crate::{ConnectionStats, Connector, DeltaEncoder};

/// Topic used when none is configured
pub const DEFAULT_TOPIC: &str = "signalk/delta";

/// Encodes each published value and sends it through `C`
pub struct DeltaSink<C: Connector> {
    encoder: DeltaEncoder,
    connector: C,
    topic: String,
    stats: ConnectionStats,
}

impl<C: Connector> DeltaSink<C> {
    /// Sink publishing on [`DEFAULT_TOPIC`]
    pub fn new(encoder: DeltaEncoder, connector: C) -> Self {
        Self { encoder, connector, topic: DEFAULT_TOPIC.to_string(), stats: ConnectionStats::default() }
    }

    /// Publish on `topic` instead
    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = topic.to_string();
        self
    }

    /// Wrap for sharing between several outputs
    pub fn shared(self) -> Rc<RefCell<Self>>
    where
        C: 'static,
    {
        Rc::new(RefCell::new(self))
    }

    /// Send counters
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Transport
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Transport, mutably
    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    fn record_failure(&mut self, path: &str, reason: String) {
        log::warn!("dropping {} update: {}", path, reason);
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(reason);
    }
}

impl<C: Connector> TelemetrySink for DeltaSink<C> {
    fn publish(&mut self, path: &str, value: &Value) {
        let payload = match self.encoder.encode(path, value) {
            Ok(payload) => payload,
            Err(err) => return self.record_failure(path, err.to_string()),
        };

        match self.connector.send(&self.topic, &payload) {
            Ok(()) => {
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += payload.len() as u64;
            }
            Err(err) => self.record_failure(path, err.to_string()),
        }
    }
}
