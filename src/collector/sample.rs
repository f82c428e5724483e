use crate::collector::basic::{BasicStatsCollector, HistogramOptions};
use crate::collector::Collect;
use crate::record::VariantRecord;
use serde_json::{Map, Value};

/// Per-sample variant of [`BasicStatsCollector`], fed single-sample views
/// by the by-sample stratifier.
///
/// Only alleles actually called in the sample's genotype contribute to the
/// Ts/Tv tally, the mutation spectrum and the variant-type distribution;
/// reference and missing calls are skipped, and a diploid genotype calling
/// the same alternate twice credits it once. The allele-frequency and
/// quality histograms update once per record, as for the basic collector.
pub struct SampleStatsCollector {
    inner: BasicStatsCollector,
}

impl SampleStatsCollector {
    pub fn new(options: HistogramOptions) -> Self {
        Self {
            inner: BasicStatsCollector::new(options),
        }
    }
}

impl Collect for SampleStatsCollector {
    fn collect(&mut self, record: &VariantRecord) {
        self.inner.note_record();

        let Some(call) = record.genotypes.first() else {
            return;
        };

        let mut processed: Vec<u32> = Vec::with_capacity(2);
        let mut observed_alt_len = 0usize;

        for allele in call.alleles.into_iter().flatten() {
            if allele == 0 || processed.contains(&allele) {
                continue;
            }
            let Some(alt) = record.alt_alleles.get(allele as usize - 1) else {
                continue;
            };

            self.inner.update_ts_tv(&record.ref_allele, alt);
            self.inner.update_mutation_spectrum(&record.ref_allele, alt);
            if observed_alt_len != alt.len() {
                self.inner.update_variant_type(&record.ref_allele, alt);
            }

            processed.push(allele);
            observed_alt_len = alt.len();
        }

        self.inner.update_allele_freq(record);
        self.inner.update_quality(record.quality);
    }

    fn append_report(&self, out: &mut Map<String, Value>) {
        self.inner.append_report(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GenotypeCall;

    fn record(
        ref_allele: &str,
        alts: &[&str],
        quality: f32,
        call: GenotypeCall,
    ) -> VariantRecord {
        VariantRecord {
            ref_allele: ref_allele.into(),
            alt_alleles: alts.iter().map(|a| a.to_string()).collect(),
            quality,
            genotypes: vec![call],
            ..Default::default()
        }
    }

    fn report(collector: &SampleStatsCollector) -> Map<String, Value> {
        let mut out = Map::new();
        collector.append_report(&mut out);
        out
    }

    #[test]
    fn only_called_alternates_count() {
        let mut collector = SampleStatsCollector::new(HistogramOptions::default());
        // het 0/1 over alts G,C: only G is called
        collector.collect(&record(
            "A",
            &["G", "C"],
            30.0,
            GenotypeCall::unphased(0, 1),
        ));

        assert_eq!(collector.inner.transitions(), 1);
        assert_eq!(collector.inner.transversions(), 0);
        let out = report(&collector);
        assert_eq!(out["var_type"]["SNP"], Value::from(1u64));
    }

    #[test]
    fn homozygous_alternate_credits_once() {
        let mut collector = SampleStatsCollector::new(HistogramOptions::default());
        collector.collect(&record("A", &["G"], 30.0, GenotypeCall::unphased(1, 1)));

        assert_eq!(collector.inner.transitions(), 1);
        let out = report(&collector);
        assert_eq!(out["var_type"]["SNP"], Value::from(1u64));
    }

    #[test]
    fn missing_and_ref_calls_still_count_the_record() {
        let mut collector = SampleStatsCollector::new(HistogramOptions::default());
        collector.collect(&record("A", &["G"], 30.0, GenotypeCall::missing()));
        collector.collect(&record("A", &["G"], 30.0, GenotypeCall::unphased(0, 0)));

        let out = report(&collector);
        assert_eq!(out["TotalRecords"], Value::from(2u64));
        assert_eq!(collector.inner.transitions(), 0);
        // quality still tallied for both records
        assert_eq!(out["qual_dist"]["regularBins"]["29"], Value::from(2u64));
    }

    #[test]
    fn distinct_called_alternates_both_count() {
        let mut collector = SampleStatsCollector::new(HistogramOptions::default());
        // 1/2 over alts G (transition) and C (transversion)
        collector.collect(&record(
            "A",
            &["G", "C"],
            30.0,
            GenotypeCall::unphased(1, 2),
        ));

        assert_eq!(collector.inner.transitions(), 1);
        assert_eq!(collector.inner.transversions(), 1);
    }
}
