pub mod basic;
pub mod sample;
pub mod stratify;

pub use basic::{BasicStatsCollector, HistogramOptions};
pub use sample::SampleStatsCollector;
pub use stratify::{GenotypeStratifier, SampleStratifier};

use crate::record::VariantRecord;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Leaf behavior plugged into a [`CollectorNode`].
///
/// Implementations accumulate statistics in `collect`, render them with
/// `append_report` (read-only, callable any number of times mid-stream) and
/// answer `is_satisfied` for early-termination queries. The default
/// satisfaction predicate is "never", so an unadorned collector keeps
/// consuming records indefinitely.
pub trait Collect {
    fn collect(&mut self, record: &VariantRecord);

    /// Merge this collector's statistics into `out` as named fields.
    fn append_report(&self, out: &mut Map<String, Value>);

    fn is_satisfied(&self) -> bool {
        false
    }
}

/// Builds a fresh sub-tree for a stratifier when a new stratum key appears.
pub type CollectorFactory = Box<dyn Fn() -> CollectorNode>;

/// Identifies a node within its parent's child list. Ids are process-unique
/// and handed out by [`CollectorNode::add_child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// The closed set of node behaviors. Leaves and plain composites merge their
/// report fields flat into the parent object; stratifiers nest one object
/// per stratum key. Making the merge style a property of the kind keeps it
/// visible and testable rather than buried in overrides.
enum NodeKind {
    Leaf(Box<dyn Collect>),
    ByGenotype(GenotypeStratifier),
    BySample(SampleStratifier),
}

/// A node in the statistics-collector composite tree.
///
/// Every node owns its children exclusively; fan-out and report merging
/// follow child insertion order. `process_variant` updates the node itself
/// first, then every child, depth-first and synchronously; `append_report`
/// walks the same tree without mutating any accumulated state.
pub struct CollectorNode {
    id: NodeId,
    kind: NodeKind,
    children: Vec<CollectorNode>,
}

impl CollectorNode {
    pub fn leaf(collector: impl Collect + 'static) -> Self {
        Self::from_kind(NodeKind::Leaf(Box::new(collector)))
    }

    pub fn by_genotype(stratifier: GenotypeStratifier) -> Self {
        Self::from_kind(NodeKind::ByGenotype(stratifier))
    }

    pub fn by_sample(stratifier: SampleStratifier) -> Self {
        Self::from_kind(NodeKind::BySample(stratifier))
    }

    fn from_kind(kind: NodeKind) -> Self {
        Self {
            id: next_node_id(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Append `child` to the child list and return its id. Ownership makes a
    /// duplicate entry unrepresentable, so unlike a pointer-based composite
    /// there is no duplicate check to perform.
    pub fn add_child(&mut self, child: CollectorNode) -> NodeId {
        let id = child.id;
        self.children.push(child);
        id
    }

    /// Detach the child with the given id, returning it. No-op (`None`)
    /// when no direct child has that id.
    pub fn remove_child(&mut self, id: NodeId) -> Option<CollectorNode> {
        let idx = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(idx))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Drive one record through this node and its entire sub-tree.
    pub fn process_variant(&mut self, record: &VariantRecord) {
        match &mut self.kind {
            NodeKind::Leaf(collector) => collector.collect(record),
            NodeKind::ByGenotype(stratifier) => stratifier.route(record),
            NodeKind::BySample(stratifier) => stratifier.route(record),
        }

        for child in &mut self.children {
            child.process_variant(record);
        }
    }

    /// Render the sub-tree's statistics into `out`. Leaf fields merge flat;
    /// each stratum renders as a nested object keyed by its stratum key.
    /// Idempotent: repeated calls with no intervening records produce
    /// identical output.
    pub fn append_report(&self, out: &mut Map<String, Value>) {
        match &self.kind {
            NodeKind::Leaf(collector) => collector.append_report(out),
            NodeKind::ByGenotype(stratifier) => stratifier.append_report(out),
            NodeKind::BySample(stratifier) => stratifier.append_report(out),
        }

        for child in &self.children {
            child.append_report(out);
        }
    }

    /// A node is satisfied only if its own predicate holds and every child
    /// is satisfied. All children are always visited; the conjunction is
    /// deliberately not short-circuited.
    pub fn is_satisfied(&self) -> bool {
        let own = match &self.kind {
            NodeKind::Leaf(collector) => collector.is_satisfied(),
            NodeKind::ByGenotype(stratifier) => stratifier.is_satisfied(),
            NodeKind::BySample(stratifier) => stratifier.is_satisfied(),
        };

        self.children
            .iter()
            .fold(own, |acc, child| acc & child.is_satisfied())
    }
}
