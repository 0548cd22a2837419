use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::merge::{ComparisonRow, ComparisonTable, Method};
use crate::stats::{mean, median, pearson, rel_diff, rel_err, spearman};
use serde::Serialize;

/// Row filter built from command-line thresholds. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowFilter {
    pub min_oracle: Option<f64>,
    pub min_estimate: Option<f64>,
}

impl RowFilter {
    pub fn is_active(&self) -> bool {
        self.min_oracle.is_some() || self.min_estimate.is_some()
    }

    pub fn accepts(&self, row: &ComparisonRow) -> bool {
        self.min_oracle.is_none_or(|min| row.oracle >= min)
            && self.min_estimate.is_none_or(|min| row.estimate >= min)
    }
}

/// Which rows a summary was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subset {
    All,
    Filtered,
}

/// `|rel_err|` aggregated over rows with a positive oracle value.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentErrorStats {
    pub n: usize,
    pub mean_abs_rel_err: Option<f64>,
    pub median_abs_rel_err: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub method: Method,
    pub n_transcripts: usize,
    pub median_rel_diff: Option<f64>,
    pub mean_rel_diff: Option<f64>,
    /// Rows where oracle and estimate are not both zero.
    pub n_expressed: usize,
    pub median_rel_diff_expressed: Option<f64>,
    pub mean_rel_diff_expressed: Option<f64>,
    pub pearson_r: Option<f64>,
    pub spearman_r: Option<f64>,
    /// Correlations on `ln(x + log_offset)`.
    pub pearson_r_log: Option<f64>,
    pub spearman_r_log: Option<f64>,
    pub percent_error: PercentErrorStats,
}

/// Summarise every method in `table`, keeping rows accepted by `filter`.
pub fn summarize(
    table: &ComparisonTable,
    filter: &RowFilter,
    config: &CompareConfig,
) -> Result<Vec<SummaryReport>, CompareError> {
    summarize_with(table, |row| filter.accepts(row), config)
}

/// Like [`summarize`] with an arbitrary row predicate.
///
/// Methods whose rows are all filtered out still get a report with
/// `n_transcripts == 0` and missing statistics.
pub fn summarize_with<F>(
    table: &ComparisonTable,
    predicate: F,
    config: &CompareConfig,
) -> Result<Vec<SummaryReport>, CompareError>
where
    F: Fn(&ComparisonRow) -> bool,
{
    table
        .methods()
        .into_iter()
        .map(|method| {
            let rows: Vec<&ComparisonRow> = table.rows_for(method).filter(|r| predicate(*r)).collect();
            summarize_rows(method, &rows, config)
        })
        .collect()
}

fn summarize_rows(
    method: &Method,
    rows: &[&ComparisonRow],
    config: &CompareConfig,
) -> Result<SummaryReport, CompareError> {
    let oracle: Vec<f64> = rows.iter().map(|r| r.oracle).collect();
    let estimate: Vec<f64> = rows.iter().map(|r| r.estimate).collect();

    let diffs: Vec<f64> = rows.iter().map(|r| rel_diff(r.estimate, r.oracle)).collect();
    let expressed: Vec<f64> = rows
        .iter()
        .zip(&diffs)
        .filter(|(r, _)| !(r.oracle == 0.0 && r.estimate == 0.0))
        .map(|(_, &d)| d)
        .collect();

    let abs_errs: Vec<f64> = rows
        .iter()
        .filter(|r| r.oracle > 0.0)
        .filter_map(|r| rel_err(r.estimate, r.oracle))
        .map(f64::abs)
        .collect();

    let log = |v: &[f64]| -> Vec<f64> { v.iter().map(|x| (x + config.log_offset).ln()).collect() };
    let (log_oracle, log_estimate) = (log(&oracle), log(&estimate));

    Ok(SummaryReport {
        method: method.clone(),
        n_transcripts: rows.len(),
        median_rel_diff: median(&diffs),
        mean_rel_diff: mean(&diffs),
        n_expressed: expressed.len(),
        median_rel_diff_expressed: median(&expressed),
        mean_rel_diff_expressed: mean(&expressed),
        pearson_r: pearson(&oracle, &estimate)?,
        spearman_r: spearman(&oracle, &estimate)?,
        pearson_r_log: pearson(&log_oracle, &log_estimate)?,
        spearman_r_log: spearman(&log_oracle, &log_estimate)?,
        percent_error: PercentErrorStats {
            n: abs_errs.len(),
            mean_abs_rel_err: mean(&abs_errs),
            median_abs_rel_err: median(&abs_errs),
        },
    })
}
