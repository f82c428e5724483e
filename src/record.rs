use std::collections::HashMap;

/// One decoded variant line: alleles, quality, the INFO values the
/// statistics need, and per-sample genotype calls.
///
/// Records are produced by the input layer, handed to the collector tree by
/// reference, and never retained beyond the call.
#[derive(Debug, Clone, Default)]
pub struct VariantRecord {
    pub ref_allele: String,
    pub alt_alleles: Vec<String>,
    pub quality: f32,
    /// Numeric INFO values keyed by tag (AF, DP, RO).
    pub info: HashMap<String, f64>,
    /// One call per sample, in header order.
    pub genotypes: Vec<GenotypeCall>,
}

impl VariantRecord {
    /// Allele frequency for this record: the AF INFO value when present,
    /// otherwise `(DP - RO) / DP`. Returns `None` when neither is available
    /// or when DP is zero (a zero depth would otherwise produce a
    /// non-finite frequency from malformed input).
    pub fn allele_frequency(&self) -> Option<f64> {
        if let Some(af) = self.info.get("AF") {
            return Some(*af);
        }

        let depth = *self.info.get("DP")?;
        let ref_obs = *self.info.get("RO")?;
        if depth == 0.0 {
            return None;
        }

        Some((depth - ref_obs) / depth)
    }

    /// Project this record down to a single sample. The view shares no
    /// mutable state with the original; its genotype list holds exactly the
    /// chosen sample's call (empty when the index is out of range, which
    /// classifies as MISSING downstream).
    pub fn sample_view(&self, sample_idx: usize) -> VariantRecord {
        VariantRecord {
            ref_allele: self.ref_allele.clone(),
            alt_alleles: self.alt_alleles.clone(),
            quality: self.quality,
            info: self.info.clone(),
            genotypes: self.genotypes.get(sample_idx).into_iter().copied().collect(),
        }
    }
}

/// A sample's genotype: two optional allele indices (0 = reference,
/// 1.. = alternates) and a phasing marker. A missing allele is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenotypeCall {
    pub alleles: [Option<u32>; 2],
    pub phased: bool,
}

impl GenotypeCall {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn unphased(first: u32, second: u32) -> Self {
        Self {
            alleles: [Some(first), Some(second)],
            phased: false,
        }
    }

    pub fn phased(first: u32, second: u32) -> Self {
        Self {
            alleles: [Some(first), Some(second)],
            phased: true,
        }
    }
}

/// Genotype classification used as the stratum key by the by-genotype
/// stratifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeCategory {
    Missing,
    Ref,
    Homo,
    Het,
}

impl GenotypeCategory {
    /// Classify the first sample's call. No call or a missing allele is
    /// MISSING; both alleles reference is REF; equal non-reference alleles
    /// are HOMO; anything else is HET.
    pub fn of(call: Option<&GenotypeCall>) -> Self {
        let Some(call) = call else {
            return GenotypeCategory::Missing;
        };

        match call.alleles {
            [Some(a), Some(b)] if a == 0 && b == 0 => GenotypeCategory::Ref,
            [Some(a), Some(b)] if a == b => GenotypeCategory::Homo,
            [Some(_), Some(_)] => GenotypeCategory::Het,
            _ => GenotypeCategory::Missing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenotypeCategory::Missing => "MISSING",
            GenotypeCategory::Ref => "REF",
            GenotypeCategory::Homo => "HOMO",
            GenotypeCategory::Het => "HET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_info(pairs: &[(&str, f64)]) -> VariantRecord {
        VariantRecord {
            info: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn allele_frequency_prefers_af() {
        let rec = record_with_info(&[("AF", 0.25), ("DP", 100.0), ("RO", 10.0)]);
        assert_eq!(rec.allele_frequency(), Some(0.25));
    }

    #[test]
    fn allele_frequency_derives_from_depth() {
        let rec = record_with_info(&[("DP", 100.0), ("RO", 60.0)]);
        assert_eq!(rec.allele_frequency(), Some(0.4));
    }

    #[test]
    fn allele_frequency_missing_inputs() {
        assert_eq!(record_with_info(&[]).allele_frequency(), None);
        assert_eq!(record_with_info(&[("DP", 100.0)]).allele_frequency(), None);
        assert_eq!(
            record_with_info(&[("DP", 0.0), ("RO", 0.0)]).allele_frequency(),
            None
        );
    }

    #[test]
    fn genotype_categories() {
        assert_eq!(GenotypeCategory::of(None), GenotypeCategory::Missing);
        assert_eq!(
            GenotypeCategory::of(Some(&GenotypeCall::missing())),
            GenotypeCategory::Missing
        );
        assert_eq!(
            GenotypeCategory::of(Some(&GenotypeCall::unphased(0, 0))),
            GenotypeCategory::Ref
        );
        assert_eq!(
            GenotypeCategory::of(Some(&GenotypeCall::unphased(1, 1))),
            GenotypeCategory::Homo
        );
        assert_eq!(
            GenotypeCategory::of(Some(&GenotypeCall::unphased(0, 1))),
            GenotypeCategory::Het
        );
        assert_eq!(
            GenotypeCategory::of(Some(&GenotypeCall::phased(1, 2))),
            GenotypeCategory::Het
        );
        // haploid-style call with one missing allele
        let half = GenotypeCall {
            alleles: [Some(1), None],
            phased: false,
        };
        assert_eq!(GenotypeCategory::of(Some(&half)), GenotypeCategory::Missing);
    }

    #[test]
    fn sample_view_projects_one_call() {
        let rec = VariantRecord {
            ref_allele: "A".into(),
            alt_alleles: vec!["G".into()],
            quality: 30.0,
            info: HashMap::new(),
            genotypes: vec![GenotypeCall::unphased(0, 1), GenotypeCall::unphased(1, 1)],
        };

        let view = rec.sample_view(1);
        assert_eq!(view.genotypes, vec![GenotypeCall::unphased(1, 1)]);
        assert_eq!(view.ref_allele, "A");

        let out_of_range = rec.sample_view(5);
        assert!(out_of_range.genotypes.is_empty());
    }
}
