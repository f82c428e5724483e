use crate::collector::{CollectorFactory, CollectorNode};
use crate::record::{GenotypeCategory, VariantRecord};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Stratifies the stream by the first sample's genotype category, spawning
/// one factory-built sub-tree per category the first time it is observed.
///
/// Homozygous-reference records are suppressed by default (dropped, not
/// routed); `with_ref_stratum` opts into routing them to a REF stratum
/// instead. The stratum map only ever grows for the lifetime of the run.
pub struct GenotypeStratifier {
    factory: CollectorFactory,
    route_ref: bool,
    strata: BTreeMap<String, CollectorNode>,
}

impl GenotypeStratifier {
    pub fn new(factory: CollectorFactory) -> Self {
        Self {
            factory,
            route_ref: false,
            strata: BTreeMap::new(),
        }
    }

    /// Route homozygous-reference records to their own REF stratum rather
    /// than dropping them.
    pub fn with_ref_stratum(mut self) -> Self {
        self.route_ref = true;
        self
    }

    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    pub(crate) fn route(&mut self, record: &VariantRecord) {
        let category = GenotypeCategory::of(record.genotypes.first());
        if category == GenotypeCategory::Ref && !self.route_ref {
            return;
        }

        let factory = &self.factory;
        let node = self
            .strata
            .entry(category.as_str().to_string())
            .or_insert_with(|| factory());
        node.process_variant(record);
    }

    pub(crate) fn append_report(&self, out: &mut Map<String, Value>) {
        append_strata(self.strata.iter().map(|(k, n)| (k.as_str(), n)), out);
    }

    pub(crate) fn is_satisfied(&self) -> bool {
        all_satisfied(self.strata.values())
    }
}

/// Stratifies the stream by sample. Sample identities are known up front
/// from the header, so every sub-tree is built eagerly at construction;
/// each record is projected to a per-sample view and routed to that
/// sample's sub-tree.
pub struct SampleStratifier {
    strata: Vec<(String, CollectorNode)>,
}

impl SampleStratifier {
    pub fn new(samples: &[String], factory: CollectorFactory) -> Self {
        Self {
            strata: samples
                .iter()
                .map(|name| (name.clone(), factory()))
                .collect(),
        }
    }

    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    pub(crate) fn route(&mut self, record: &VariantRecord) {
        for (sample_idx, (_, node)) in self.strata.iter_mut().enumerate() {
            // transient view, scoped to this call
            let view = record.sample_view(sample_idx);
            node.process_variant(&view);
        }
    }

    pub(crate) fn append_report(&self, out: &mut Map<String, Value>) {
        append_strata(self.strata.iter().map(|(k, n)| (k.as_str(), n)), out);
    }

    pub(crate) fn is_satisfied(&self) -> bool {
        all_satisfied(self.strata.iter().map(|(_, node)| node))
    }
}

/// Nested-by-key merge: one object per stratum, each holding its sub-tree's
/// own report. This is what distinguishes a stratifier from a plain
/// composite, which merges flat.
fn append_strata<'a>(
    strata: impl Iterator<Item = (&'a str, &'a CollectorNode)>,
    out: &mut Map<String, Value>,
) {
    for (key, node) in strata {
        let mut nested = Map::new();
        node.append_report(&mut nested);
        out.insert(key.to_string(), Value::Object(nested));
    }
}

fn all_satisfied<'a>(nodes: impl Iterator<Item = &'a CollectorNode>) -> bool {
    nodes.fold(true, |acc, node| acc & node.is_satisfied())
}
