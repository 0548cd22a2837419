use crate::api::{compare, Comparison};
use crate::cli::{Args, QuantSpec};
use crate::config::CompareConfig;
use crate::fasta::load_reference_ids;
use crate::merge::{Method, MethodEstimates};
use crate::quant::load_quant;
use crate::report;
use crate::summary::{RowFilter, Subset, SummaryReport};
use crate::truth::load_truth;
use crate::types::{Metric, QuantRecord};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Stats {
    pub reference_transcripts: u64,
    pub truth_rows: u64,
    pub methods: u64,
    pub oracle_warnings: u64,
    pub comparison_rows: u64,
}

impl Args {
    pub fn compare_config(&self) -> CompareConfig {
        CompareConfig {
            mean_fragment_length: self.mean_frag_len,
            id_width: if self.no_truncate { None } else { Some(self.id_width) },
            log_offset: self.log_offset,
            rescale_tpm: !self.no_rescale,
        }
    }

    pub fn row_filter(&self) -> RowFilter {
        RowFilter { min_oracle: self.min_oracle, min_estimate: self.min_estimate }
    }
}

/// Group `--quant` arguments by method name, keeping first-seen order, and
/// average replicates.
pub fn load_methods(specs: &[QuantSpec]) -> Result<Vec<MethodEstimates>> {
    let mut grouped: Vec<(String, Vec<Vec<QuantRecord>>)> = Vec::new();
    for spec in specs {
        let records = load_quant(&spec.path, spec.format)?;
        match grouped.iter_mut().find(|(name, _)| *name == spec.name) {
            Some((_, reps)) => reps.push(records),
            None => grouped.push((spec.name.clone(), vec![records])),
        }
    }

    grouped
        .into_iter()
        .map(|(name, replicates)| -> Result<MethodEstimates> {
            tracing::info!(method = %name, replicates = replicates.len(), "loaded method");
            let method = Method::new(name)?;
            Ok(MethodEstimates::from_replicates(method, &replicates)?)
        })
        .collect()
}

pub fn run(args: &Args) -> Result<Stats> {
    let config = args.compare_config();
    let filter = args.row_filter();

    let reference_ids = load_reference_ids(&args.reference)?;
    let truth = load_truth(&args.truth)?;
    let methods = load_methods(&args.quant)?;
    let truth_label = if args.no_truth_series { None } else { Some(Method::new(args.truth_label.as_str())?) };

    let mut stats = Stats {
        reference_transcripts: reference_ids.len() as u64,
        truth_rows: truth.len() as u64,
        methods: (methods.len() + usize::from(truth_label.is_some())) as u64,
        ..Stats::default()
    };

    let comparison = compare(&reference_ids, &truth, methods, truth_label.as_ref(), &config)?;
    stats.oracle_warnings = comparison.oracle.warnings.len() as u64;
    stats.comparison_rows = comparison.tables.iter().map(|t| t.rows.len() as u64).sum();

    let summaries = comparison.summaries(&filter, &config)?;
    log_summaries(&summaries);
    write_outputs(&args.out_dir, &comparison, &summaries)?;

    Ok(stats)
}

fn log_summaries(summaries: &[(Metric, Subset, Vec<SummaryReport>)]) {
    for (metric, subset, reports) in summaries {
        for r in reports {
            tracing::info!(
                %metric,
                ?subset,
                method = %r.method,
                n = r.n_transcripts,
                median_rel_diff = ?r.median_rel_diff,
                median_rel_diff_expressed = ?r.median_rel_diff_expressed,
                pearson = ?r.pearson_r,
                spearman = ?r.spearman_r,
                "summary"
            );
        }
    }
}

fn create(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_outputs(
    dir: &Path,
    comparison: &Comparison,
    summaries: &[(Metric, Subset, Vec<SummaryReport>)],
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    report::write_oracle(create(dir, "oracle.tsv")?, &comparison.oracle)?;
    for table in &comparison.tables {
        let name = match table.metric {
            Metric::Tpm => "tpm_comparison.tsv",
            Metric::EstCounts => "counts_comparison.tsv",
        };
        report::write_comparison(create(dir, name)?, table)?;
    }
    report::write_summaries(create(dir, "summary.tsv")?, summaries)?;
    tracing::debug!(dir = %dir.display(), "wrote reports");
    Ok(())
}
