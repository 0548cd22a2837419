//! Public library API for comparing quantification estimates against a
//! simulated ground truth.
//!
//! # Example
//!
//! ```no_run
//! use quant_oracle::{compare, CompareConfig, Method, MethodEstimates, RowFilter};
//!
//! // let reference_ids = quant_oracle::fasta::load_reference_ids(path_to_fasta)?;
//! // let truth = quant_oracle::truth::load_truth(path_to_truth)?;
//! // let kallisto = quant_oracle::quant::load_quant(path_to_abundance, None)?;
//! //
//! // let methods = vec![MethodEstimates::new(Method::new("kallisto")?, kallisto)];
//! // let config = CompareConfig::default();
//! // let comparison = compare(&reference_ids, &truth, methods, None, &config)?;
//! // let summaries = comparison.summaries(&RowFilter::default(), &config)?;
//! ```

use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::merge::{merge_methods, ComparisonTable, Method, MethodEstimates};
use crate::oracle::{build_oracle, Oracle};
use crate::summary::{summarize, Subset, SummaryReport, RowFilter};
use crate::truth::TruthRecord;
use crate::types::Metric;

/// Oracle plus one long comparison table per metric.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub oracle: Oracle,
    pub tables: Vec<ComparisonTable>,
}

impl Comparison {
    pub fn table(&self, metric: Metric) -> Option<&ComparisonTable> {
        self.tables.iter().find(|t| t.metric == metric)
    }

    /// Per-method summaries for every metric: always over all rows, and
    /// additionally over the filtered rows when `filter` is active.
    pub fn summaries(
        &self,
        filter: &RowFilter,
        config: &CompareConfig,
    ) -> Result<Vec<(Metric, Subset, Vec<SummaryReport>)>, CompareError> {
        let mut out = Vec::new();
        for table in &self.tables {
            out.push((table.metric, Subset::All, summarize(table, &RowFilter::default(), config)?));
            if filter.is_active() {
                out.push((table.metric, Subset::Filtered, summarize(table, filter, config)?));
            }
        }
        Ok(out)
    }
}

/// Build the oracle and merge every method onto it.
///
/// With `truth_label`, the ground truth's own reported TPM is compared as an
/// additional method under that name, ahead of the others.
pub fn compare(
    reference_ids: &[String],
    truth: &[TruthRecord],
    methods: Vec<MethodEstimates>,
    truth_label: Option<&Method>,
    config: &CompareConfig,
) -> Result<Comparison, CompareError> {
    let oracle = build_oracle(reference_ids, truth, config)?;

    let mut all = Vec::with_capacity(methods.len() + 1);
    if let Some(label) = truth_label {
        all.push(MethodEstimates::new(label.clone(), oracle.reported.clone()));
    }
    all.extend(methods);

    let tables = merge_methods(&oracle, &all, config)?;
    Ok(Comparison { oracle, tables })
}
