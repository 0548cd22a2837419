use crate::types::QuantRecord;
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantFormat {
    /// kallisto `abundance.tsv`
    Kallisto,
    /// salmon `quant.sf`
    Salmon,
    /// `target_id  tpm  est_counts`
    Generic,
}

impl FromStr for QuantFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kallisto" => Ok(QuantFormat::Kallisto),
            "salmon" => Ok(QuantFormat::Salmon),
            "generic" | "tsv" => Ok(QuantFormat::Generic),
            other => Err(anyhow!("unknown quantification format: {}", other)),
        }
    }
}

pub fn detect_format(path: &Path) -> Result<QuantFormat> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if name == "abundance.tsv" {
        return Ok(QuantFormat::Kallisto);
    }
    match ext.as_str() {
        "sf" => Ok(QuantFormat::Salmon),
        _ => Err(anyhow!(
            "unable to detect quantification format of {}; give it explicitly as NAME:FORMAT=PATH",
            path.display()
        )),
    }
}

#[derive(Debug, Deserialize)]
struct KallistoRow {
    target_id: String,
    est_counts: f64,
    tpm: f64,
}

#[derive(Debug, Deserialize)]
struct SalmonRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "TPM")]
    tpm: f64,
    #[serde(rename = "NumReads")]
    num_reads: f64,
}

#[derive(Debug, Deserialize)]
struct GenericRow {
    target_id: String,
    tpm: f64,
    est_counts: f64,
}

impl From<KallistoRow> for QuantRecord {
    fn from(row: KallistoRow) -> Self {
        QuantRecord::new(row.target_id, row.tpm, row.est_counts)
    }
}

impl From<SalmonRow> for QuantRecord {
    fn from(row: SalmonRow) -> Self {
        QuantRecord::new(row.name, row.tpm, row.num_reads)
    }
}

impl From<GenericRow> for QuantRecord {
    fn from(row: GenericRow) -> Self {
        QuantRecord::new(row.target_id, row.tpm, row.est_counts)
    }
}

/// Load one quantification table, keeping the file's row order.
pub fn load_quant(path: &Path, format: Option<QuantFormat>) -> Result<Vec<QuantRecord>> {
    let format = match format {
        Some(f) => f,
        None => detect_format(path)?,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open quantification table {}", path.display()))?;

    let records = match format {
        QuantFormat::Kallisto => read_rows::<KallistoRow>(&mut reader, path)?,
        QuantFormat::Salmon => read_rows::<SalmonRow>(&mut reader, path)?,
        QuantFormat::Generic => read_rows::<GenericRow>(&mut reader, path)?,
    };

    for rec in &records {
        if !(rec.tpm >= 0.0 && rec.est_counts >= 0.0) {
            bail!(
                "{}: transcript {} has invalid tpm={} est_counts={}",
                path.display(),
                rec.target_id,
                rec.tpm,
                rec.est_counts
            );
        }
    }
    tracing::debug!(n = records.len(), path = %path.display(), ?format, "loaded quantification");
    Ok(records)
}

fn read_rows<T>(reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<Vec<QuantRecord>>
where
    T: for<'de> Deserialize<'de> + Into<QuantRecord>,
{
    let mut out = Vec::new();
    for (line, result) in reader.deserialize::<T>().enumerate() {
        let row = result
            .with_context(|| format!("{}: malformed row {}", path.display(), line + 2))?;
        out.push(row.into());
    }
    Ok(out)
}
