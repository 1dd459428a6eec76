//! Graph builder
//!
//! Nodes are added first, then wired. Every `connect` is checked before the
//! subscription is made, so a rejected edge leaves the graph as it was:
//!
//! 1. both ends belong to this builder
//! 2. no self-loop
//! 3. no duplicate edge
//! 4. no second upstream for a consumer
//! 5. `to` cannot already reach `from`
//!
//! `build` consumes the builder; there is no way to add an edge afterwards.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};

use super::{Edge, NodeInfo, NodeRole, Pipeline, Topology};
use crate::config::{ConfigItem, ConfigRegistry, Configurable};
use crate::errors::{ConfigResult, WiringError};
use crate::node::{Consumer, Emitter, NodeId, SharedConsumer};
use crate::producers::Producer;
use crate::sinks::{SharedSink, SkOutput};
use crate::transforms::{Transform, TransformNode};
use crate::value::Value;

/// Typed reference to a node owned by the pipeline
///
/// Handles stay valid after `build`; use them to read last values or to
/// change parameters directly.
pub struct Handle<N> {
    id: NodeId,
    node: Rc<RefCell<N>>,
}

impl<N> Clone for Handle<N> {
    fn clone(&self) -> Self {
        Self { id: self.id, node: Rc::clone(&self.node) }
    }
}

impl<N> Handle<N> {
    /// Arena id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Shared borrow of the node
    pub fn borrow(&self) -> Ref<'_, N> {
        self.node.borrow()
    }

    /// Exclusive borrow of the node
    ///
    /// Must not be held across a scheduler tick.
    pub fn borrow_mut(&self) -> RefMut<'_, N> {
        self.node.borrow_mut()
    }
}

/// Assembles nodes and edges into a [`Pipeline`]
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeInfo>,
    edges: Vec<Edge>,
    producers: Vec<Rc<RefCell<dyn Producer>>>,
    config: ConfigRegistry,
}

impl GraphBuilder {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scheduler-fired source
    pub fn add_producer<P>(&mut self, producer: P) -> Handle<P>
    where
        P: Producer + Emitter + 'static,
    {
        let name = String::from(producer.name());
        let node = Rc::new(RefCell::new(producer));
        let shared: Rc<RefCell<dyn Producer>> = node.clone();
        self.producers.push(shared);
        Handle { id: self.push_node(name, NodeRole::Producer), node }
    }

    /// Add a transform
    pub fn add_transform<X>(&mut self, transform: X) -> Handle<TransformNode<X>>
    where
        X: Transform + 'static,
    {
        let name = String::from(transform.name());
        let node = Rc::new(RefCell::new(TransformNode::new(transform)));
        Handle { id: self.push_node(name, NodeRole::Transform), node }
    }

    /// Add a terminal node publishing samples of type `T` under `path`
    pub fn add_sink<T>(&mut self, path: &str, sink: SharedSink) -> Handle<SkOutput<T>>
    where
        T: Into<Value> + 'static,
    {
        let node = Rc::new(RefCell::new(SkOutput::new(path, sink)));
        Handle { id: self.push_node(String::from(path), NodeRole::Sink), node }
    }

    /// Subscribe `to` to the output of `from`
    pub fn connect<S, C>(&mut self, from: &Handle<S>, to: &Handle<C>) -> Result<(), WiringError>
    where
        S: Emitter + 'static,
        C: Consumer<S::Output> + 'static,
    {
        self.check_edge(from.id, to.id)?;

        let consumer: SharedConsumer<S::Output> = to.node.clone();
        from.node.borrow_mut().observable_mut().subscribe(consumer);
        self.edges.push(Edge { from: from.id, to: to.id });

        log_debug!("wired {} -> {}", from.id, to.id);
        Ok(())
    }

    /// Register a node's parameters under `item.path`
    pub fn expose<N>(&mut self, handle: &Handle<N>, item: ConfigItem) -> ConfigResult<()>
    where
        N: Configurable + 'static,
    {
        self.config.register(item, handle.node.clone())
    }

    /// Node count so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Freeze the topology
    ///
    /// Nodes without an input (other than producers) or without subscribers
    /// (other than sinks) are allowed but logged at `warn`.
    pub fn build(self) -> Result<Pipeline, WiringError> {
        let execution_order = self.execution_order()?;

        for info in &self.nodes {
            let has_input = self.edges.iter().any(|e| e.to == info.id);
            let has_output = self.edges.iter().any(|e| e.from == info.id);
            if info.role != NodeRole::Producer && !has_input {
                log_warn!("node {} ({}) has no input", info.id, info.name);
            }
            if info.role != NodeRole::Sink && !has_output {
                log_warn!("node {} ({}) has no subscribers", info.id, info.name);
            }
        }

        Ok(Pipeline::new(
            Topology { nodes: self.nodes, edges: self.edges, execution_order },
            self.producers,
            self.config,
        ))
    }

    fn push_node(&mut self, name: String, role: NodeRole) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeInfo { id, name, role });
        id
    }

    fn check_edge(&self, from: NodeId, to: NodeId) -> Result<(), WiringError> {
        for id in [from, to] {
            if id.index() >= self.nodes.len() {
                return Err(WiringError::UnknownNode(id));
            }
        }
        if from == to {
            return Err(WiringError::SelfLoop(from));
        }
        if let Some(existing) = self.edges.iter().find(|e| e.to == to) {
            if existing.from == from {
                return Err(WiringError::DuplicateEdge { from, to });
            }
            return Err(WiringError::FanIn { node: to, existing: existing.from });
        }
        if self.reaches(to, from) {
            return Err(WiringError::CycleDetected { from, to });
        }
        Ok(())
    }

    /// Depth-first search along existing edges
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            stack.extend(self.edges.iter().filter(|e| e.from == current).map(|e| e.to));
        }
        false
    }

    /// Kahn's algorithm; fails if any node is left unscheduled
    fn execution_order(&self) -> Result<Vec<NodeId>, WiringError> {
        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        let mut adjacent: Vec<Vec<NodeId>> = vec![Vec::new(); n];

        for edge in &self.edges {
            adjacent[edge.from.index()].push(edge.to);
            in_degree[edge.to.index()] += 1;
        }

        let mut ready: VecDeque<NodeId> =
            self.nodes.iter().map(|info| info.id).filter(|id| in_degree[id.index()] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &next in &adjacent[node.index()] {
                in_degree[next.index()] -= 1;
                if in_degree[next.index()] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() != n {
            let stuck = self
                .edges
                .iter()
                .find(|e| in_degree[e.to.index()] > 0)
                .copied()
                .unwrap_or(Edge { from: NodeId(0), to: NodeId(0) });
            return Err(WiringError::CycleDetected { from: stuck.from, to: stuck.to });
        }
        Ok(order)
    }
}
