use crate::cli::Args;
use crate::collector::{
    BasicStatsCollector, CollectorFactory, CollectorNode, GenotypeStratifier, HistogramOptions,
    SampleStatsCollector, SampleStratifier,
};
use crate::input::VcfSource;
use crate::progress::ProgressBarBuilder;
use crate::report;
use anyhow::{bail, Result};
use std::io::{self, Write};

pub fn run(args: Args) -> Result<()> {
    if args.update_rate == 0 {
        bail!("Update rate must be at least 1");
    }
    if args.qual_lower < 0 {
        bail!("Invalid quality histogram lowerbound value {}", args.qual_lower);
    }
    if args.qual_upper < args.qual_lower {
        bail!(
            "Quality histogram upperbound {} is lower than lowerbound {}",
            args.qual_upper,
            args.qual_lower
        );
    }

    let mut source = match args.vcf_file.as_deref() {
        Some("-") | None => VcfSource::from_stdin()?,
        Some(path) => VcfSource::from_path(path)?,
    };

    let options = HistogramOptions::new(args.qual_lower, args.qual_upper, args.log_scale_af);
    let mut root = build_tree(&args, &options, source.samples());

    let progress = ProgressBarBuilder::new("Streaming variants")
        .with_tick()
        .build()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut total_records: u64 = 0;
    let mut first_update = args.first_update;

    for record in source.records() {
        let record = record?;
        root.process_variant(&record);
        total_records += 1;
        progress.set_position(total_records);

        if !args.batch
            && (total_records % args.update_rate == 0
                || (first_update > 0 && total_records >= first_update))
        {
            progress.suspend(|| report::write_snapshot(&mut out, &root))?;
            // the first-update trigger fires once, then disarms
            first_update = 0;
        }

        if root.is_satisfied() {
            break;
        }
    }

    progress.finish_and_clear();
    report::write_snapshot(&mut out, &root)?;
    out.flush()?;

    Ok(())
}

/// Root basic collector, with one stratifier child per enabled policy. The
/// by-genotype strata reuse the full basic collector; the by-sample strata
/// use the per-sample leaf, which only credits genotype-called alleles.
fn build_tree(args: &Args, options: &HistogramOptions, samples: &[String]) -> CollectorNode {
    let mut root = CollectorNode::leaf(BasicStatsCollector::new(options.clone()));

    if args.by_genotype {
        let opts = options.clone();
        let factory: CollectorFactory =
            Box::new(move || CollectorNode::leaf(BasicStatsCollector::new(opts.clone())));
        root.add_child(CollectorNode::by_genotype(GenotypeStratifier::new(factory)));
    }

    if args.by_sample {
        let opts = options.clone();
        let factory: CollectorFactory =
            Box::new(move || CollectorNode::leaf(SampleStatsCollector::new(opts.clone())));
        root.add_child(CollectorNode::by_sample(SampleStratifier::new(
            samples, factory,
        )));
    }

    root
}
