use crate::record::{GenotypeCall, VariantRecord};
use anyhow::{Context, Result};
use rust_htslib::bcf::record::GenotypeAllele;
use rust_htslib::{bcf, bcf::Read};
use std::collections::HashMap;
use std::path::Path;

/// Record source over a VCF/BCF file or stdin.
///
/// Owns the htslib reader and the header-derived sample list, and decodes
/// each `bcf::Record` into the [`VariantRecord`] the collector tree
/// consumes: alleles, QUAL, the AF/DP/RO INFO values and per-sample
/// genotypes.
pub struct VcfSource {
    reader: bcf::Reader,
    samples: Vec<String>,
}

impl VcfSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = bcf::Reader::from_path(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        Ok(Self::from_reader(reader))
    }

    pub fn from_stdin() -> Result<Self> {
        let reader = bcf::Reader::from_stdin().context("Failed to open stdin as VCF/BCF")?;
        Ok(Self::from_reader(reader))
    }

    fn from_reader(reader: bcf::Reader) -> Self {
        let samples = reader
            .header()
            .samples()
            .iter()
            .map(|s| String::from_utf8_lossy(s).to_string())
            .collect();
        Self { reader, samples }
    }

    /// Sample names from the header, in column order.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Synchronous pull iterator over decoded records.
    pub fn records(&mut self) -> impl Iterator<Item = Result<VariantRecord>> + '_ {
        let sample_count = self.samples.len();
        self.reader.records().map(move |result| {
            let record = result.context("Failed to read VCF record")?;
            Ok(decode_record(&record, sample_count))
        })
    }
}

fn decode_record(record: &bcf::Record, sample_count: usize) -> VariantRecord {
    let alleles = record.alleles();
    let ref_allele = alleles
        .first()
        .map(|a| String::from_utf8_lossy(a).into_owned())
        .unwrap_or_default();
    let alt_alleles = alleles
        .iter()
        .skip(1)
        .map(|a| String::from_utf8_lossy(a).into_owned())
        .collect();

    let mut info = HashMap::new();
    if let Ok(Some(values)) = record.info(b"AF").float() {
        if let Some(af) = values.first() {
            info.insert("AF".to_string(), *af as f64);
        }
    }
    for tag in ["DP", "RO"] {
        if let Ok(Some(values)) = record.info(tag.as_bytes()).integer() {
            if let Some(v) = values.first() {
                info.insert(tag.to_string(), *v as f64);
            }
        }
    }

    let genotypes = match record.genotypes() {
        Ok(genotypes) => (0..sample_count)
            .map(|idx| decode_genotype(&genotypes.get(idx)))
            .collect(),
        Err(_) => Vec::new(), // no GT format field in this file
    };

    VariantRecord {
        ref_allele,
        alt_alleles,
        quality: record.qual(),
        info,
        genotypes,
    }
}

fn decode_genotype(genotype: &bcf::record::Genotype) -> GenotypeCall {
    let mut alleles = [None, None];
    let mut phased = false;

    for (slot, allele) in genotype.iter().take(2).enumerate() {
        match allele {
            GenotypeAllele::Unphased(idx) => alleles[slot] = Some(*idx as u32),
            GenotypeAllele::Phased(idx) => {
                alleles[slot] = Some(*idx as u32);
                phased = true;
            }
            GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => {}
        }
    }

    GenotypeCall { alleles, phased }
}
