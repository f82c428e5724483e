pub mod cli;
pub mod collector;
pub mod commands;
pub mod input;
pub mod record;
pub mod report;

mod progress;

// Re-export the tree-building surface
pub use collector::{
    BasicStatsCollector, Collect, CollectorFactory, CollectorNode, GenotypeStratifier,
    HistogramOptions, NodeId, SampleStatsCollector, SampleStratifier,
};
pub use record::{GenotypeCall, GenotypeCategory, VariantRecord};
