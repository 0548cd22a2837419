use crate::merge::ComparisonTable;
use crate::oracle::Oracle;
use crate::stats::{rel_diff, rel_err};
use crate::summary::{Subset, SummaryReport};
use crate::types::{HashMap, HashMapExt, Metric};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Written in place of undefined statistics.
pub const MISSING: &str = "NA";

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn tsv_writer<W: Write>(w: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(w)
}

#[derive(Serialize)]
struct OracleRow<'a> {
    target_id: &'a str,
    length: f64,
    eff_len: f64,
    counts: u64,
    tpm: f64,
    flag: &'a str,
}

pub fn write_oracle<W: Write>(w: W, oracle: &Oracle) -> Result<()> {
    let mut flags: HashMap<&str, &str> = HashMap::new();
    for (target_id, flag) in oracle.warnings.iter().filter_map(|w| w.record_flag()) {
        flags.entry(target_id).or_insert(flag);
    }

    let mut writer = tsv_writer(w);
    for rec in &oracle.records {
        writer.serialize(OracleRow {
            target_id: &rec.target_id,
            length: rec.length,
            eff_len: rec.eff_len,
            counts: rec.counts,
            tpm: rec.tpm,
            flag: flags.get(rec.target_id.as_str()).copied().unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ComparisonOut<'a> {
    target_id: &'a str,
    method: &'a str,
    oracle: f64,
    estimate: f64,
    rel_diff: f64,
    rel_err: String,
}

/// Long comparison table with per-row error columns, ready for plotting.
pub fn write_comparison<W: Write>(w: W, table: &ComparisonTable) -> Result<()> {
    let mut writer = tsv_writer(w);
    for row in &table.rows {
        writer.serialize(ComparisonOut {
            target_id: &row.target_id,
            method: row.method.as_str(),
            oracle: row.oracle,
            estimate: row.estimate,
            rel_diff: rel_diff(row.estimate, row.oracle),
            rel_err: fmt_opt(rel_err(row.estimate, row.oracle)),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SummaryOut<'a> {
    metric: Metric,
    subset: Subset,
    method: &'a str,
    n_transcripts: usize,
    median_rel_diff: String,
    mean_rel_diff: String,
    n_expressed: usize,
    median_rel_diff_expressed: String,
    mean_rel_diff_expressed: String,
    pearson_r: String,
    spearman_r: String,
    pearson_r_log: String,
    spearman_r_log: String,
    n_percent_error: usize,
    mean_abs_rel_err: String,
    median_abs_rel_err: String,
}

pub fn write_summaries<W: Write>(w: W, summaries: &[(Metric, Subset, Vec<SummaryReport>)]) -> Result<()> {
    let mut writer = tsv_writer(w);
    for (metric, subset, reports) in summaries {
        for r in reports {
            writer.serialize(SummaryOut {
                metric: *metric,
                subset: *subset,
                method: r.method.as_str(),
                n_transcripts: r.n_transcripts,
                median_rel_diff: fmt_opt(r.median_rel_diff),
                mean_rel_diff: fmt_opt(r.mean_rel_diff),
                n_expressed: r.n_expressed,
                median_rel_diff_expressed: fmt_opt(r.median_rel_diff_expressed),
                mean_rel_diff_expressed: fmt_opt(r.mean_rel_diff_expressed),
                pearson_r: fmt_opt(r.pearson_r),
                spearman_r: fmt_opt(r.spearman_r),
                pearson_r_log: fmt_opt(r.pearson_r_log),
                spearman_r_log: fmt_opt(r.spearman_r_log),
                n_percent_error: r.percent_error.n,
                mean_abs_rel_err: fmt_opt(r.percent_error.mean_abs_rel_err),
                median_abs_rel_err: fmt_opt(r.percent_error.median_abs_rel_err),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
