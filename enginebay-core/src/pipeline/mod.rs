//! Pipeline assembly and startup
//!
//! ## Lifecycle
//!
//! ```text
//! GraphBuilder ──build()──→ Pipeline ──start()──→ Scheduler
//!   add_*  connect  expose     topology  config      tick()
//! ```
//!
//! Nodes live in `Rc<RefCell<_>>` and are held by their upstream's subscriber
//! list, by the producer list (producers only), by the config registry
//! (exposed nodes) and by any [`Handle`] the caller kept. The [`Topology`] is
//! a read-only record of what was wired; the subscriber lists are what
//! actually carry samples.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::config::ConfigRegistry;
use crate::errors::SchedulerError;
use crate::node::NodeId;
use crate::producers::Producer;
use crate::scheduler::{Scheduler, Task, TaskId};
use crate::time::Timestamp;

mod builder;

pub use builder::{GraphBuilder, Handle};

/// Kind of node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Scheduler-fired source
    Producer,
    /// One-in, at-most-one-out converter
    Transform,
    /// Terminal publisher
    Sink,
}

/// Static description of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Arena id
    pub id: NodeId,
    /// Producer or transform name; semantic path for sinks
    pub name: String,
    /// Kind of node
    pub role: NodeRole,
}

/// Directed subscription from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Emitting node
    pub from: NodeId,
    /// Subscribed node
    pub to: NodeId,
}

/// Frozen wiring of a pipeline
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<NodeInfo>,
    edges: Vec<Edge>,
    execution_order: Vec<NodeId>,
}

impl Topology {
    /// Nodes in creation order
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    /// Edges in wiring order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// A topological order: every node appears after its upstream
    pub fn execution_order(&self) -> &[NodeId] {
        &self.execution_order
    }

    /// Description of `id`
    pub fn node(&self, id: NodeId) -> Option<&NodeInfo> {
        self.nodes.get(id.index())
    }

    /// Direct subscribers of `id`, in fan-out order
    pub fn downstream(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter(move |e| e.from == id).map(|e| e.to)
    }

    /// The single upstream of `id`, if any
    pub fn upstream(&self, id: NodeId) -> Option<NodeId> {
        self.edges.iter().find(|e| e.to == id).map(|e| e.from)
    }
}

/// Adapts a shared producer to the scheduler
struct ProducerTask(Rc<RefCell<dyn Producer>>);

impl Task for ProducerTask {
    fn name(&self) -> &'static str {
        self.0.borrow().name()
    }

    fn period_ms(&self) -> u64 {
        self.0.borrow().period_ms()
    }

    fn run(&mut self, now: Timestamp) {
        self.0.borrow_mut().fire(now);
    }
}

/// A built, immutable-topology pipeline
pub struct Pipeline {
    topology: Topology,
    producers: Vec<Rc<RefCell<dyn Producer>>>,
    config: ConfigRegistry,
    started: bool,
}

impl Pipeline {
    fn new(
        topology: Topology,
        producers: Vec<Rc<RefCell<dyn Producer>>>,
        config: ConfigRegistry,
    ) -> Self {
        Self { topology, producers, config, started: false }
    }

    /// Register every producer with `scheduler`
    ///
    /// Each producer's `start` hook runs at the scheduler's current time,
    /// then producers are registered in creation order. A second call
    /// registers nothing.
    pub fn start(&mut self, scheduler: &mut Scheduler) -> Result<Vec<TaskId>, SchedulerError> {
        if self.started {
            log_warn!("pipeline already started");
            return Ok(Vec::new());
        }

        let now = scheduler.now();
        let mut ids = Vec::with_capacity(self.producers.len());
        for producer in &self.producers {
            producer.borrow_mut().start(now);
            ids.push(scheduler.register(ProducerTask(Rc::clone(producer)))?);
        }
        self.started = true;

        log_info!(
            "pipeline started: {} producers, {} nodes, {} edges",
            self.producers.len(),
            self.topology.nodes.len(),
            self.topology.edges.len()
        );
        Ok(ids)
    }

    /// Wiring record
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Exposed parameters
    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    /// Exposed parameters, for overrides
    pub fn config_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.config
    }

    /// Producer count
    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigItem, ParamValue};
    use crate::node::Emitter;
    use crate::producers::{DigitalInputCounter, EdgeCounter, PulseCount, RepeatSensor};
    use crate::sinks::MemorySink;
    use crate::time::ManualTime;
    use crate::transforms::{Frequency, Linear};
    use crate::value::Value;
    use alloc::sync::Arc;

    #[test]
    fn start_registers_each_producer_once() {
        let memory = MemorySink::shared();
        let mut graph = GraphBuilder::new();
        let fast = graph.add_producer(RepeatSensor::new("fast", 500, || Ok(1.0_f32)));
        let slow = graph.add_producer(RepeatSensor::new("slow", 2000, || Ok(2.0_f32)));
        let fast_out = graph.add_sink::<f32>("fast", memory.clone());
        let slow_out = graph.add_sink::<f32>("slow", memory.clone());
        graph.connect(&fast, &fast_out).unwrap();
        graph.connect(&slow, &slow_out).unwrap();
        let mut pipeline = graph.build().unwrap();

        let clock = ManualTime::new(0);
        let mut scheduler = Scheduler::new(clock.clone());
        assert_eq!(pipeline.start(&mut scheduler).unwrap().len(), 2);
        assert!(pipeline.start(&mut scheduler).unwrap().is_empty());
        assert_eq!(scheduler.task_count(), 2);

        for _ in 0..4 {
            clock.advance(500);
            scheduler.tick();
        }

        let memory = memory.borrow();
        assert_eq!(memory.values("fast").len(), 4);
        assert_eq!(memory.values("slow").len(), 1);
    }

    #[test]
    fn first_rate_counts_only_edges_after_start() {
        let memory = MemorySink::shared();
        let edges = Arc::new(EdgeCounter::new());
        let mut graph = GraphBuilder::new();
        let pin = graph.add_producer(DigitalInputCounter::new(16, 2000, edges.clone()));
        let hz = graph.add_transform(Frequency::new(1.0));
        let out = graph.add_sink::<f32>("propulsion.main.revolutions", memory.clone());
        graph.connect(&pin, &hz).unwrap();
        graph.connect(&hz, &out).unwrap();
        let mut pipeline = graph.build().unwrap();

        // Edges counted while the rest of the system was still booting
        for _ in 0..600 {
            edges.record_edge();
        }
        let clock = ManualTime::new(60_000);
        let mut scheduler = Scheduler::new(clock.clone());
        pipeline.start(&mut scheduler).unwrap();

        for _ in 0..20 {
            edges.record_edge();
        }
        clock.set(62_000);
        scheduler.tick();

        assert_eq!(pin.borrow().last_value(), Some(&PulseCount { count: 20, window_ms: 2000 }));
        assert_eq!(memory.borrow().last("propulsion.main.revolutions"), Some(&Value::Float(10.0)));
    }

    #[test]
    fn topology_lists_neighbours() {
        let memory = MemorySink::shared();
        let mut graph = GraphBuilder::new();
        let source = graph.add_producer(RepeatSensor::new("source", 1000, || Ok(1.0_f32)));
        let gain = graph.add_transform(Linear::identity());
        let out = graph.add_sink::<f32>("environment.inside.temperature", memory);
        graph.connect(&source, &gain).unwrap();
        graph.connect(&gain, &out).unwrap();
        let pipeline = graph.build().unwrap();
        let topology = pipeline.topology();

        assert_eq!(topology.downstream(source.id()).collect::<Vec<_>>(), [gain.id()]);
        assert_eq!(topology.upstream(out.id()), Some(gain.id()));
        assert_eq!(topology.upstream(source.id()), None);
        assert_eq!(topology.node(out.id()).map(|n| n.role), Some(NodeRole::Sink));
        assert_eq!(
            topology.node(out.id()).map(|n| n.name.as_str()),
            Some("environment.inside.temperature")
        );
    }

    #[test]
    fn parameter_override_reaches_running_chain() {
        let memory = MemorySink::shared();
        let mut graph = GraphBuilder::new();
        let source = graph.add_producer(RepeatSensor::new("source", 1000, || Ok(10.0_f32)));
        let gain = graph.add_transform(Linear::identity());
        let out = graph.add_sink::<f32>("x", memory.clone());
        graph.connect(&source, &gain).unwrap();
        graph.connect(&gain, &out).unwrap();
        graph.expose(&gain, ConfigItem::new("/x/gain")).unwrap();
        let mut pipeline = graph.build().unwrap();

        let clock = ManualTime::new(0);
        let mut scheduler = Scheduler::new(clock.clone());
        pipeline.start(&mut scheduler).unwrap();

        clock.set(1000);
        scheduler.tick();
        pipeline.config_mut().set("/x/gain", "offset", &ParamValue::Float(5.0)).unwrap();
        clock.set(2000);
        scheduler.tick();

        let values: Vec<Value> = memory.borrow().values("x").into_iter().cloned().collect();
        assert_eq!(values, [Value::Float(10.0), Value::Float(15.0)]);
    }
}
