use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input VCF/BCF file (reads stdin when omitted)
    pub vcf_file: Option<String>,

    /// Emit a report every N records
    #[arg(short = 'u', long = "update-rate", default_value = "1000")]
    pub update_rate: u64,

    /// Emit one early report once N records have been seen (0 disables)
    #[arg(short = 'f', long = "first-update", default_value = "0")]
    pub first_update: u64,

    /// Inclusive lower bound of the quality histogram
    #[arg(short = 'q', long = "qual-lower-val", default_value = "1")]
    pub qual_lower: i32,

    /// Inclusive upper bound of the quality histogram
    #[arg(short = 'Q', long = "qual-upper-val", default_value = "200")]
    pub qual_upper: i32,

    /// Bin allele frequencies on a log10 scale
    #[arg(short = 'l', long = "log-scale-af")]
    pub log_scale_af: bool,

    /// Only emit the final end-of-stream report
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Additionally stratify statistics by sample
    #[arg(long = "by-sample")]
    pub by_sample: bool,

    /// Additionally stratify statistics by genotype category
    #[arg(long = "by-genotype")]
    pub by_genotype: bool,
}
