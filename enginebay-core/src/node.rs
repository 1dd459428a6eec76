//! Node plumbing: identities, subscriber lists and the push contract
//!
//! A node that emits owns an [`Observable`]: its last value and the ordered
//! list of consumers subscribed to it. Emitting stores the value and pushes a
//! copy into each subscriber in subscription order. Each consumer runs its
//! own downstream chain to completion before the next subscriber is called,
//! which gives the depth-first propagation order of a firing.
//!
//! Subscribers are shared through `Rc<RefCell<_>>`. Since the graph is
//! acyclic and each consumer has a single upstream, a node is never borrowed
//! twice during one propagation.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Index of a node in the pipeline arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena slot
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receives samples of type `T`
pub trait Consumer<T> {
    /// Handle one sample; runs the downstream chain synchronously
    fn consume(&mut self, value: T);
}

/// Shared handle to a consumer
pub type SharedConsumer<T> = Rc<RefCell<dyn Consumer<T>>>;

/// A node with an output
pub trait Emitter {
    /// Sample type on outgoing edges
    type Output: Clone + 'static;

    /// Output slot of this node
    fn observable(&self) -> &Observable<Self::Output>;

    /// Output slot of this node, for subscribing
    fn observable_mut(&mut self) -> &mut Observable<Self::Output>;

    /// Most recently emitted value
    fn last_value(&self) -> Option<&Self::Output> {
        self.observable().last()
    }
}

/// Most recent value plus subscriber list
pub struct Observable<T> {
    last: Option<T>,
    subscribers: Vec<SharedConsumer<T>>,
    emitted: u64,
}

impl<T: Clone> Observable<T> {
    /// Empty slot with no subscribers
    pub fn new() -> Self {
        Self { last: None, subscribers: Vec::new(), emitted: 0 }
    }

    /// Add a consumer at the end of the fan-out order
    pub fn subscribe(&mut self, consumer: SharedConsumer<T>) {
        self.subscribers.push(consumer);
    }

    /// Store `value` and push it to every subscriber in order
    pub fn emit(&mut self, value: T) {
        self.emitted += 1;
        self.last = Some(value.clone());
        for subscriber in &self.subscribers {
            subscriber.borrow_mut().consume(value.clone());
        }
    }

    /// Most recently emitted value
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Number of emits since construction
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}
