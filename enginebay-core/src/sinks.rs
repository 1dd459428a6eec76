//! Telemetry sinks
//!
//! A sink is the boundary of the graph. [`SkOutput`] takes the samples of
//! one chain and hands each one, with its semantic path
//! (`"propulsion.engine.temperature"`), to a [`TelemetrySink`]. The sink
//! behind it owns the transport: Signal K session, MQTT, a serial line.
//!
//! Sinks do not transform, buffer or retry. Several `SkOutput`s may share
//! one `TelemetrySink`.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::marker::PhantomData;

use crate::config::{Configurable, ParamValue};
use crate::errors::{ConfigError, ConfigResult};
use crate::node::Consumer;
use crate::value::Value;

/// Receiver of published telemetry
pub trait TelemetrySink {
    /// Hand one value for `path` to the transport
    fn publish(&mut self, path: &str, value: &Value);
}

/// Shared handle to a telemetry sink
pub type SharedSink = Rc<RefCell<dyn TelemetrySink>>;

/// Terminal node publishing every sample under a fixed path
pub struct SkOutput<T> {
    path: String,
    sink: SharedSink,
    published: u64,
    _sample: PhantomData<fn(T)>,
}

impl<T> SkOutput<T> {
    /// Publish to `sink` under `path`
    pub fn new(path: &str, sink: SharedSink) -> Self {
        Self { path: String::from(path), sink, published: 0, _sample: PhantomData }
    }

    /// Semantic path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Samples handed to the sink
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl<T: Into<Value>> Consumer<T> for SkOutput<T> {
    fn consume(&mut self, value: T) {
        let value = value.into();
        self.sink.borrow_mut().publish(&self.path, &value);
        self.published += 1;
    }
}

impl<T> Configurable for SkOutput<T> {
    fn param_keys(&self) -> &'static [&'static str] {
        &["sk_path"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "sk_path" => Some(ParamValue::Text(self.path.clone())),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "sk_path" => {
                let path = value
                    .as_str()
                    .ok_or(ConfigError::TypeMismatch { key: "sk_path", expected: "a string" })?;
                if path.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "sk_path",
                        reason: "must not be empty",
                    });
                }
                self.path = String::from(path);
                Ok(())
            }
            _ => Err(ConfigError::UnknownParam(String::from(key))),
        }
    }
}

/// Sink that keeps everything it is given
///
/// Useful for tests and for bench-top runs without a transport.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<(String, Value)>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// New sink behind a shared handle, ready for `add_sink`
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Every publish in arrival order
    pub fn records(&self) -> &[(String, Value)] {
        &self.records
    }

    /// Values published under `path`, oldest first
    pub fn values(&self, path: &str) -> Vec<&Value> {
        self.records.iter().filter(|(p, _)| p == path).map(|(_, v)| v).collect()
    }

    /// Most recent value published under `path`
    pub fn last(&self, path: &str) -> Option<&Value> {
        self.records.iter().rev().find(|(p, _)| p == path).map(|(_, v)| v)
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl TelemetrySink for MemorySink {
    fn publish(&mut self, path: &str, value: &Value) {
        self.records.push((String::from(path), value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_publishes_under_its_path() {
        let memory = MemorySink::shared();
        let mut out: SkOutput<f32> = SkOutput::new("propulsion.engine.revolutions", memory.clone());

        out.consume(13.5);
        out.consume(14.0);

        let memory = memory.borrow();
        assert_eq!(memory.values("propulsion.engine.revolutions").len(), 2);
        assert_eq!(memory.last("propulsion.engine.revolutions"), Some(&Value::Float(14.0)));
        assert_eq!(out.published(), 2);
    }

    #[test]
    fn outputs_share_one_sink() {
        let memory = MemorySink::shared();
        let mut state: SkOutput<bool> = SkOutput::new("bilge.raw", memory.clone());
        let mut text: SkOutput<String> = SkOutput::new("bilge.monitor", memory.clone());

        state.consume(false);
        text.consume(String::from("Bilge clear"));

        let memory = memory.borrow();
        assert_eq!(memory.records().len(), 2);
        assert_eq!(memory.last("bilge.raw"), Some(&Value::Bool(false)));
        assert_eq!(memory.last("bilge.monitor"), Some(&Value::Text("Bilge clear".into())));
    }

    #[test]
    fn path_can_be_renamed_but_not_emptied() {
        let memory = MemorySink::shared();
        let mut out: SkOutput<f32> = SkOutput::new("tanks.fuel.0.currentLevel", memory.clone());

        assert!(out.set_param("sk_path", &ParamValue::from("")).is_err());
        out.set_param("sk_path", &ParamValue::from("tanks.fuel.1.currentLevel")).unwrap();
        out.consume(0.5);

        assert_eq!(memory.borrow().last("tanks.fuel.1.currentLevel"), Some(&Value::Float(0.5)));
    }
}
