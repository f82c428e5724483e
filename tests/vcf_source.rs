use std::fs;
use vcfstats_stream::input::VcfSource;
use vcfstats_stream::{GenotypeCall, GenotypeCategory};

const TEST_VCF: &str = "\
##fileformat=VCFv4.2\n\
##contig=<ID=chr1>\n\
##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele Frequency\">\n\
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">\n\
##INFO=<ID=RO,Number=1,Type=Integer,Description=\"Reference allele observation count\">\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
chr1\t100\t.\tA\tG\t30\t.\tAF=0.5\tGT\t0/1\t1|1\n\
chr1\t200\t.\tAT\tA\t40\t.\tDP=100;RO=75\tGT\t./.\t0/0\n";

#[test]
fn decodes_records_from_a_vcf_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.vcf");
    fs::write(&path, TEST_VCF).unwrap();

    let mut source = VcfSource::from_path(&path).unwrap();
    assert_eq!(
        source.samples().to_vec(),
        vec!["S1".to_string(), "S2".to_string()]
    );

    let records: Vec<_> = source
        .records()
        .collect::<Result<_, _>>()
        .expect("all records decode");
    assert_eq!(records.len(), 2);

    let snp = &records[0];
    assert_eq!(snp.ref_allele, "A");
    assert_eq!(snp.alt_alleles, ["G".to_string()]);
    assert_eq!(snp.quality, 30.0);
    assert!((snp.allele_frequency().unwrap() - 0.5).abs() < 1e-6);
    assert_eq!(snp.genotypes[0], GenotypeCall::unphased(0, 1));
    assert_eq!(snp.genotypes[1], GenotypeCall::phased(1, 1));

    let del = &records[1];
    assert_eq!(del.ref_allele, "AT");
    assert_eq!(del.alt_alleles, ["A".to_string()]);
    assert!((del.allele_frequency().unwrap() - 0.25).abs() < 1e-6);
    assert_eq!(
        GenotypeCategory::of(del.genotypes.first()),
        GenotypeCategory::Missing
    );
    assert_eq!(
        GenotypeCategory::of(del.genotypes.get(1)),
        GenotypeCategory::Ref
    );
}
