use crate::collector::Collect;
use crate::record::VariantRecord;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Log-scale allele-frequency histogram range. Frequencies whose log10
/// falls below the lower bound collapse into the dedicated catch-all bin.
pub const LOG_AF_LOWER_BOUND: f64 = -5.0;
pub const LOG_AF_UPPER_BOUND: f64 = 0.0;

/// Regular allele-frequency bin count; log mode carries one extra bin for
/// the below-range catch-all.
const AF_BINS_LINEAR: usize = 51;
const AF_BINS_LOG: usize = 52;

/// Histogram configuration shared by the basic and per-sample collectors.
#[derive(Clone, Debug)]
pub struct HistogramOptions {
    /// Inclusive lower bound of the quality histogram.
    pub qual_lower: i32,
    /// Inclusive upper bound of the quality histogram.
    pub qual_upper: i32,
    /// Bin allele frequencies on a log10 scale instead of linearly.
    pub log_scale_af: bool,
}

impl HistogramOptions {
    pub fn new(qual_lower: i32, qual_upper: i32, log_scale_af: bool) -> Self {
        Self {
            qual_lower,
            qual_upper,
            log_scale_af,
        }
    }
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self::new(1, 200, false)
    }
}

/// Variant classification per alternate allele, by allele-length comparison
/// and the symbolic-allele bracket notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    Snp,
    Mnp,
    Ins,
    Del,
    Sv,
    Other,
}

impl VariantType {
    pub const ALL: [VariantType; 6] = [
        VariantType::Snp,
        VariantType::Mnp,
        VariantType::Ins,
        VariantType::Del,
        VariantType::Sv,
        VariantType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VariantType::Snp => "SNP",
            VariantType::Mnp => "MNP",
            VariantType::Ins => "INS",
            VariantType::Del => "DEL",
            VariantType::Sv => "SV",
            VariantType::Other => "OTHER",
        }
    }

    pub fn classify(ref_allele: &str, alt_allele: &str) -> VariantType {
        let ref_len = ref_allele.len();
        let alt_len = alt_allele.len();

        if ref_len == 1 && alt_len == 1 {
            VariantType::Snp
        } else if ref_len == alt_len {
            VariantType::Mnp
        } else if alt_allele.contains('<') {
            VariantType::Sv
        } else if alt_len > ref_len {
            VariantType::Ins
        } else if alt_len < ref_len {
            VariantType::Del
        } else {
            VariantType::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseClass {
    Purine,
    Pyrimidine,
}

/// A/G are purines, C/T pyrimidines, case-insensitive. Anything else does
/// not participate in the Ts/Tv tally.
fn base_class(base: u8) -> Option<BaseClass> {
    match base {
        b'A' | b'a' | b'G' | b'g' => Some(BaseClass::Purine),
        b'C' | b'c' | b'T' | b't' => Some(BaseClass::Pyrimidine),
        _ => None,
    }
}

/// Mutation-spectrum row/column index, ordered A, G, C, T.
fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'G' | b'g' => Some(1),
        b'C' | b'c' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

fn index_base(idx: usize) -> char {
    ['A', 'G', 'C', 'T'][idx]
}

/// Closed-interval binning: `floor((value - min) / (max - min) * bins)`.
/// `value == max` intentionally maps to index `bins`, one past the last
/// full-width interval; callers size their storage accordingly.
fn closed_interval_bin(value: f64, min: f64, max: f64, bins: usize) -> i64 {
    ((value - min) / (max - min) * bins as f64).floor() as i64
}

/// Open-interval binning: bin 0 is the below-range catch-all, the rest of
/// the range is divided into `bins - 1` closed intervals shifted up by one.
fn open_interval_bin(value: f64, min: f64, max: f64, bins: usize) -> i64 {
    if value < min {
        0
    } else {
        closed_interval_bin(value, min, max, bins - 1) + 1
    }
}

/// Leaf collector computing the whole-record statistics suite: totals,
/// Ts/Tv, mutation spectrum, variant-type distribution, indel sizes, and
/// the allele-frequency and quality histograms.
pub struct BasicStatsCollector {
    total_records: u64,
    transitions: u64,
    transversions: u64,
    mutation_spectrum: [[u64; 4]; 4],
    variant_types: [u64; VariantType::ALL.len()],
    indel_sizes: BTreeMap<i64, u64>,
    allele_freq_hist: Vec<u64>,
    quality_dist: Vec<u64>,
    options: HistogramOptions,
}

impl BasicStatsCollector {
    pub fn new(options: HistogramOptions) -> Self {
        let af_bins = if options.log_scale_af {
            AF_BINS_LOG
        } else {
            AF_BINS_LINEAR
        };
        // regular bins plus the underflow and overflow catch-alls
        let qual_bins = (options.qual_upper - options.qual_lower + 1) as usize + 2;

        Self {
            total_records: 0,
            transitions: 0,
            transversions: 0,
            mutation_spectrum: [[0; 4]; 4],
            variant_types: [0; VariantType::ALL.len()],
            indel_sizes: BTreeMap::new(),
            allele_freq_hist: vec![0; af_bins],
            quality_dist: vec![0; qual_bins],
            options,
        }
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn transversions(&self) -> u64 {
        self.transversions
    }

    pub(crate) fn note_record(&mut self) {
        self.total_records += 1;
    }

    /// Ts/Tv tally, evaluated only for single-base substitutions where both
    /// bases classify as purine or pyrimidine.
    pub(crate) fn update_ts_tv(&mut self, ref_allele: &str, alt_allele: &str) {
        if ref_allele.len() != 1 || alt_allele.len() != 1 || ref_allele == alt_allele {
            return;
        }
        if ref_allele == "." || alt_allele == "." {
            return;
        }

        let (Some(ref_class), Some(alt_class)) = (
            base_class(ref_allele.as_bytes()[0]),
            base_class(alt_allele.as_bytes()[0]),
        ) else {
            return;
        };

        if ref_class == alt_class {
            self.transitions += 1;
        } else {
            self.transversions += 1;
        }
    }

    /// Mutation spectrum over {A,G,C,T}x{A,G,C,T}; non-ACGT bases and
    /// non-SNP alleles are excluded.
    pub(crate) fn update_mutation_spectrum(&mut self, ref_allele: &str, alt_allele: &str) {
        if ref_allele.len() != 1 || alt_allele.len() != 1 {
            return;
        }

        if let (Some(first), Some(second)) = (
            base_index(ref_allele.as_bytes()[0]),
            base_index(alt_allele.as_bytes()[0]),
        ) {
            self.mutation_spectrum[first][second] += 1;
        }
    }

    pub(crate) fn update_variant_type(&mut self, ref_allele: &str, alt_allele: &str) {
        let vt = VariantType::classify(ref_allele, alt_allele);
        if matches!(vt, VariantType::Ins | VariantType::Del) {
            self.update_indel_size(ref_allele.len(), alt_allele.len());
        }
        self.variant_types[vt as usize] += 1;
    }

    fn update_indel_size(&mut self, ref_len: usize, alt_len: usize) {
        let indel_size = alt_len as i64 - ref_len as i64;
        *self.indel_sizes.entry(indel_size).or_insert(0) += 1;
    }

    /// Bin the record's allele frequency. A frequency of exactly zero is
    /// never binned, and values outside (0, 1] are malformed input skipped
    /// before they can reach the bin-range assertion.
    pub(crate) fn update_allele_freq(&mut self, record: &VariantRecord) {
        let Some(freq) = record.allele_frequency() else {
            return;
        };
        if !(freq > 0.0) || freq > 1.0 {
            return;
        }

        let bins = self.allele_freq_hist.len();
        let bin = if self.options.log_scale_af {
            open_interval_bin(freq.log10(), LOG_AF_LOWER_BOUND, LOG_AF_UPPER_BOUND, bins - 1)
        } else {
            closed_interval_bin(freq, 0.0, 1.0, bins - 1)
        };

        assert!(
            bin >= 0 && (bin as usize) < bins,
            "allele frequency bin {bin} out of range for {bins} bins (freq {freq})"
        );
        self.allele_freq_hist[bin as usize] += 1;
    }

    /// Quality histogram with inclusive bounds: below-lower goes to the
    /// underflow bin, above-upper to the overflow bin, everything else to
    /// `value - lower`.
    pub(crate) fn update_quality(&mut self, quality: f32) {
        // a missing QUAL decodes as NaN; skip the statistic for the record
        if quality.is_nan() {
            return;
        }

        let int_qual = quality as i32;
        let span = (self.options.qual_upper - self.options.qual_lower + 1) as usize;

        let bin = if int_qual < self.options.qual_lower {
            span
        } else if int_qual > self.options.qual_upper {
            span + 1
        } else {
            (int_qual - self.options.qual_lower) as usize
        };

        self.quality_dist[bin] += 1;
    }

    fn ts_tv_ratio(&self) -> Value {
        if self.transversions == 0 {
            Value::Null
        } else {
            Value::from(self.transitions as f64 / self.transversions as f64)
        }
    }

    fn af_hist_report(&self) -> Value {
        let mut sparse = Map::new();
        for (idx, count) in self.allele_freq_hist.iter().enumerate() {
            if *count > 0 {
                sparse.insert(idx.to_string(), Value::from(*count));
            }
        }

        let mut af_hist = Map::new();
        af_hist.insert(
            "usingLogScaleAF".into(),
            Value::from(self.options.log_scale_af),
        );
        if self.options.log_scale_af {
            af_hist.insert("logAFHistLowerBound".into(), Value::from(LOG_AF_LOWER_BOUND));
            af_hist.insert("logAFHistUpperBound".into(), Value::from(LOG_AF_UPPER_BOUND));
        }
        af_hist.insert("afHistBins".into(), Value::Object(sparse));
        Value::Object(af_hist)
    }

    fn mut_spec_report(&self) -> Value {
        let mut spec = Map::new();
        for (first, row) in self.mutation_spectrum.iter().enumerate() {
            // all four columns render, always, to keep the 4x4 shape
            spec.insert(index_base(first).to_string(), json!(row));
        }
        Value::Object(spec)
    }

    fn var_type_report(&self) -> Value {
        let mut types = Map::new();
        for vt in VariantType::ALL {
            types.insert(
                vt.label().to_string(),
                Value::from(self.variant_types[vt as usize]),
            );
        }
        Value::Object(types)
    }

    fn qual_dist_report(&self) -> Value {
        let span = (self.options.qual_upper - self.options.qual_lower + 1) as usize;

        let mut sparse = Map::new();
        for (idx, count) in self.quality_dist[..span].iter().enumerate() {
            if *count > 0 {
                sparse.insert(idx.to_string(), Value::from(*count));
            }
        }

        // bounds and catch-all bins always render, even when zero
        let mut qual_dist = Map::new();
        qual_dist.insert("qualHistLowerBound".into(), Value::from(self.options.qual_lower));
        qual_dist.insert("qualHistUpperBound".into(), Value::from(self.options.qual_upper));
        qual_dist.insert("regularBins".into(), Value::Object(sparse));
        qual_dist.insert("lowerBin".into(), Value::from(self.quality_dist[span]));
        qual_dist.insert("upperBin".into(), Value::from(self.quality_dist[span + 1]));
        Value::Object(qual_dist)
    }

    fn indel_size_report(&self) -> Value {
        let mut sizes = Map::new();
        for (size, count) in &self.indel_sizes {
            sizes.insert(size.to_string(), Value::from(*count));
        }
        Value::Object(sizes)
    }
}

impl Collect for BasicStatsCollector {
    fn collect(&mut self, record: &VariantRecord) {
        self.note_record();

        for alt in &record.alt_alleles {
            self.update_ts_tv(&record.ref_allele, alt);
            self.update_mutation_spectrum(&record.ref_allele, alt);
            self.update_variant_type(&record.ref_allele, alt);
        }

        self.update_allele_freq(record);
        self.update_quality(record.quality);
    }

    fn append_report(&self, out: &mut Map<String, Value>) {
        out.insert("TotalRecords".into(), Value::from(self.total_records));
        // derived at report time so it can never go stale
        out.insert("TsTvRatio".into(), self.ts_tv_ratio());
        out.insert("af_hist".into(), self.af_hist_report());
        out.insert("mut_spec".into(), self.mut_spec_report());
        out.insert("var_type".into(), self.var_type_report());
        out.insert("qual_dist".into(), self.qual_dist_report());
        out.insert("indel_size".into(), self.indel_size_report());
    }
}
