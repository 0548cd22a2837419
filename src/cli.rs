use crate::quant::QuantFormat;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quant-oracle",
    about = "Compare transcript quantifications against simulated ground truth",
    version
)]
pub struct Args {
    /// Reference transcripts the reads were simulated from
    #[arg(short = 'r', long = "reference", value_name = "FASTA")]
    pub reference: PathBuf,

    /// Ground truth table (target_id, length, tpm, fpkm, counts)
    #[arg(short = 't', long = "truth", value_name = "TSV")]
    pub truth: PathBuf,

    /// Quantification to compare; repeat a NAME to average replicates
    #[arg(short = 'Q', long = "quant", value_name = "NAME[:FORMAT]=PATH", value_parser = parse_quant_spec, required = true)]
    pub quant: Vec<QuantSpec>,

    /// Output directory
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Mean fragment length of the simulated library
    #[arg(long = "mean-frag-len", default_value_t = crate::config::DEFAULT_MEAN_FRAGMENT_LENGTH)]
    pub mean_frag_len: f64,

    /// Characters of each identifier used to join reference and truth
    #[arg(long = "id-width", default_value_t = crate::config::ENSEMBL_ID_WIDTH, conflicts_with = "no_truncate")]
    pub id_width: usize,

    /// Join reference and truth on full identifiers
    #[arg(long)]
    pub no_truncate: bool,

    /// Method name for the ground truth's own reported TPM
    #[arg(long = "truth-label", default_value = "generator")]
    pub truth_label: String,

    /// Do not compare the ground truth's reported TPM
    #[arg(long)]
    pub no_truth_series: bool,

    /// Keep each method's TPM as reported instead of rescaling to 1e6
    #[arg(long)]
    pub no_rescale: bool,

    /// Filtered summary: minimum oracle value
    #[arg(long, value_name = "X")]
    pub min_oracle: Option<f64>,

    /// Filtered summary: minimum estimate
    #[arg(long, value_name = "Y")]
    pub min_estimate: Option<f64>,

    /// Offset added before taking logs for log-scale correlations (> 0)
    #[arg(long, default_value_t = 1.0, value_parser = parse_positive)]
    pub log_offset: f64,

    /// Set logging level to WARN
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// One `--quant` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantSpec {
    pub name: String,
    pub format: Option<QuantFormat>,
    pub path: PathBuf,
}

pub fn parse_quant_spec(s: &str) -> Result<QuantSpec> {
    let (lhs, path) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME[:FORMAT]=PATH, got {:?}", s))?;
    let (name, format) = match lhs.split_once(':') {
        Some((name, fmt)) => (name, Some(fmt.parse::<QuantFormat>()?)),
        None => (lhs, None),
    };
    if name.is_empty() || path.is_empty() {
        return Err(anyhow!("expected NAME[:FORMAT]=PATH, got {:?}", s));
    }
    Ok(QuantSpec { name: name.to_string(), format, path: PathBuf::from(path) })
}

pub fn parse_positive(s: &str) -> Result<f64> {
    let value: f64 = s.parse().map_err(|_| anyhow!("not a number: {:?}", s))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(anyhow!("must be a positive number, got {}", value));
    }
    Ok(value)
}
