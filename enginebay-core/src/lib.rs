//! Reactive sensor-transform pipeline for engine-room telemetry
//!
//! Samples physical sensors, derives calibrated values and republishes them
//! to a telemetry consumer under dotted semantic paths. The pipeline is a
//! fixed-topology DAG of producers, transforms and sinks, driven by a single
//! cooperative [`Scheduler`]. The one concurrent input is the interrupt-fed
//! [`EdgeCounter`] behind [`DigitalInputCounter`].
//!
//! Key constraints:
//! - Single thread, no blocking, no queueing between nodes
//! - Topology frozen once [`GraphBuilder::build`] returns
//! - Parameters stay mutable through [`ConfigRegistry`]
//!
//! ```no_run
//! use std::{cell::RefCell, rc::Rc};
//! use enginebay_core::{
//!     GraphBuilder, Linear, MemorySink, RepeatSensor, Scheduler, SharedSink,
//!     time::MonotonicTime,
//! };
//!
//! let sink: SharedSink = Rc::new(RefCell::new(MemorySink::new()));
//! let mut graph = GraphBuilder::new();
//!
//! let source = graph.add_producer(RepeatSensor::new("oil temp", 10_000, || Ok(351.2_f32)));
//! let calibrate = graph.add_transform(Linear::new(1.0, 0.0));
//! let out = graph.add_sink::<f32>("propulsion.engine.oilTemperature", sink);
//! graph.connect(&source, &calibrate)?;
//! graph.connect(&calibrate, &out)?;
//!
//! let mut pipeline = graph.build()?;
//! let mut scheduler = Scheduler::new(MonotonicTime::new());
//! pipeline.start(&mut scheduler)?;
//! scheduler.run_until(|| false);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod errors;
pub mod node;
pub mod pipeline;
pub mod producers;
pub mod scheduler;
pub mod sinks;
pub mod time;
pub mod transforms;
pub mod value;

// Public API
pub use config::{ConfigItem, ConfigRegistry, Configurable, ParamValue};
pub use errors::{
    ConfigError, ConfigResult, CurveError, ReadError, ReadResult, SchedulerError, WiringError,
};
pub use node::{Consumer, Emitter, NodeId, Observable};
pub use pipeline::{Edge, GraphBuilder, Handle, NodeInfo, NodeRole, Pipeline, Topology};
pub use producers::{
    AnalogInput, DigitalInputCounter, DigitalInputState, EdgeCounter, Producer, PulseCount,
    RepeatSensor, UptimeSensor,
};
pub use scheduler::{Scheduler, Task, TaskId, TaskStats};
pub use sinks::{MemorySink, SharedSink, SkOutput, TelemetrySink};
pub use transforms::{
    AnalogVoltage, CurveInterpolator, CurvePoint, CurveTable, Frequency, LambdaTransform, Linear,
    MovingAverage, Transform, TransformNode, VoltageDividerR2,
};
pub use value::{Validatable, Value};

/// Crate version, as published in telemetry source metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
