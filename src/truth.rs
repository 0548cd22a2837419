use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// One row of the simulator's ground-truth table.
#[derive(Debug, Clone, PartialEq)]
pub struct TruthRecord {
    pub target_id: String,
    pub length: f64,
    /// TPM as reported by the simulator.
    pub tpm: f64,
    pub fpkm: f64,
    /// Simulated read count; fractional.
    pub counts: f64,
}

/// Load a ground-truth table with columns `target_id, length, tpm, fpkm, counts`.
///
/// Columns are taken by position. A leading header line is recognised by a
/// non-numeric `length` field and skipped. Extra columns are ignored.
pub fn load_truth(path: &Path) -> Result<Vec<TruthRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open ground truth table {}", path.display()))?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: malformed row {}", path.display(), idx + 1))?;
        if record.len() < 5 {
            return Err(anyhow!(
                "{}: row {} has {} columns, expected at least 5",
                path.display(),
                idx + 1,
                record.len()
            ));
        }
        if idx == 0 && record[1].trim().parse::<f64>().is_err() {
            continue;
        }
        let field = |col: usize, name: &str| -> Result<f64> {
            record[col].trim().parse::<f64>().map_err(|_| {
                anyhow!("{}: row {}: invalid {} {:?}", path.display(), idx + 1, name, &record[col])
            })
        };
        out.push(TruthRecord {
            target_id: record[0].trim().to_string(),
            length: field(1, "length")?,
            tpm: field(2, "tpm")?,
            fpkm: field(3, "fpkm")?,
            counts: field(4, "counts")?,
        });
    }

    tracing::debug!(n = out.len(), path = %path.display(), "loaded ground truth");
    Ok(out)
}
