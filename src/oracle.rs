use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::truth::TruthRecord;
use crate::types::{rescale_to_tpm, HashMap, HashMapExt, HashSet, HashSetExt, QuantRecord, TPM_TOTAL};
use std::fmt;

/// True abundance of one reference transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRecord {
    pub target_id: String,
    pub length: f64,
    /// `length - mean_fragment_length`; negative for short transcripts.
    pub eff_len: f64,
    pub counts: u64,
    pub tpm: f64,
}

impl OracleRecord {
    /// Reads were assigned to a transcript that has no room for a fragment.
    pub fn is_suspect(&self) -> bool {
        self.counts > 0 && self.eff_len <= 0.0
    }
}

/// Data-quality findings that do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleWarning {
    NonPositiveEffectiveLength { target_id: String, counts: u64, eff_len: f64 },
    DuplicateTruthId { target_id: String },
    /// A second reference id shortened to a join key already taken.
    CanonicalCollision { target_id: String, canonical: String, first: String },
    DuplicateReferenceId { target_id: String },
    InvalidCount { target_id: String, counts: f64 },
    NoExpression,
}

impl fmt::Display for OracleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleWarning::NonPositiveEffectiveLength { target_id, counts, eff_len } => write!(
                f,
                "{target_id}: {counts} reads but effective length {eff_len}; TPM forced to 0"
            ),
            OracleWarning::DuplicateTruthId { target_id } => {
                write!(f, "{target_id}: duplicate ground truth row, keeping the first")
            }
            OracleWarning::CanonicalCollision { target_id, canonical, first } => write!(
                f,
                "{target_id}: join key {canonical} already used by {first}; zero-filled (check --id-width)"
            ),
            OracleWarning::DuplicateReferenceId { target_id } => {
                write!(f, "{target_id}: repeated reference identifier, keeping the first")
            }
            OracleWarning::InvalidCount { target_id, counts } => {
                write!(f, "{target_id}: invalid ground truth count {counts}; treated as 0")
            }
            OracleWarning::NoExpression => {
                write!(f, "no transcript has both reads and a positive effective length")
            }
        }
    }
}

impl OracleWarning {
    /// Short tag for the oracle table's `flag` column, for warnings that
    /// concern one written record.
    pub fn record_flag(&self) -> Option<(&str, &'static str)> {
        match self {
            OracleWarning::NonPositiveEffectiveLength { target_id, .. } => {
                Some((target_id, "nonpositive_eff_len"))
            }
            OracleWarning::CanonicalCollision { target_id, .. } => Some((target_id, "id_collision")),
            OracleWarning::InvalidCount { target_id, .. } => Some((target_id, "invalid_count")),
            OracleWarning::DuplicateTruthId { .. }
            | OracleWarning::DuplicateReferenceId { .. }
            | OracleWarning::NoExpression => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Oracle {
    /// One record per reference identifier, in reference order.
    pub records: Vec<OracleRecord>,
    pub warnings: Vec<OracleWarning>,
    /// The simulator's own TPM, rescaled to 1e6, with its fractional counts.
    pub reported: Vec<QuantRecord>,
}

impl Oracle {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tpm(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.tpm).collect()
    }
}

/// Join reference identifiers against the ground truth and derive true TPM.
pub fn build_oracle(
    reference_ids: &[String],
    truth: &[TruthRecord],
    config: &CompareConfig,
) -> Result<Oracle, CompareError> {
    let mut warnings = Vec::new();

    let mut by_id: HashMap<&str, &TruthRecord> = HashMap::with_capacity(truth.len());
    for row in truth {
        let key = config.canonical_id(&row.target_id);
        if by_id.contains_key(key) {
            warnings.push(OracleWarning::DuplicateTruthId { target_id: row.target_id.clone() });
            continue;
        }
        by_id.insert(key, row);
    }

    let mut records = Vec::with_capacity(reference_ids.len());
    let mut reported = Vec::with_capacity(reference_ids.len());
    let mut matched = 0usize;
    let mut seen: HashSet<&str> = HashSet::with_capacity(reference_ids.len());
    let mut key_owner: HashMap<&str, &str> = HashMap::with_capacity(reference_ids.len());

    for id in reference_ids {
        if !seen.insert(id.as_str()) {
            warnings.push(OracleWarning::DuplicateReferenceId { target_id: id.clone() });
            continue;
        }
        let key = config.canonical_id(id);
        let hit = match key_owner.get(key) {
            Some(&first) => {
                warnings.push(OracleWarning::CanonicalCollision {
                    target_id: id.clone(),
                    canonical: key.to_string(),
                    first: first.to_string(),
                });
                None
            }
            None => {
                key_owner.insert(key, id.as_str());
                by_id.get(key).copied()
            }
        };
        if hit.is_some() {
            matched += 1;
        }
        // Unmatched transcripts are zero-filled after the join, eff_len included.
        let (length, eff_len, raw_counts, raw_tpm) = hit.map_or((0.0, 0.0, 0.0, 0.0), |t| {
            (t.length, t.length - config.mean_fragment_length, t.counts, t.tpm)
        });
        let counts = round_counts(raw_counts).unwrap_or_else(|| {
            warnings.push(OracleWarning::InvalidCount { target_id: id.clone(), counts: raw_counts });
            0
        });
        records.push(OracleRecord {
            target_id: id.clone(),
            length,
            eff_len,
            counts,
            tpm: 0.0,
        });
        let reported_counts = if raw_counts.is_finite() { raw_counts.max(0.0) } else { 0.0 };
        reported.push(QuantRecord::new(id.clone(), raw_tpm, reported_counts));
    }

    if matched == 0 {
        return Err(CompareError::IdentifierMismatch {
            n_reference: reference_ids.len(),
            n_truth: truth.len(),
        });
    }

    let tpm = derive_tpm(&records);
    if tpm.iter().all(|&t| t == 0.0) {
        warnings.push(OracleWarning::NoExpression);
    }
    for (rec, t) in records.iter_mut().zip(tpm) {
        rec.tpm = t;
        if rec.is_suspect() {
            warnings.push(OracleWarning::NonPositiveEffectiveLength {
                target_id: rec.target_id.clone(),
                counts: rec.counts,
                eff_len: rec.eff_len,
            });
        }
    }

    let mut reported_tpm: Vec<f64> = reported.iter().map(|r| r.tpm).collect();
    rescale_to_tpm(&mut reported_tpm);
    for (rec, t) in reported.iter_mut().zip(reported_tpm) {
        rec.tpm = t;
    }

    for w in &warnings {
        tracing::warn!("oracle: {}", w);
    }
    tracing::info!(
        reference = reference_ids.len(),
        truth = truth.len(),
        matched,
        warnings = warnings.len(),
        "oracle built"
    );

    Ok(Oracle { records, warnings, reported })
}

/// TPM from the records' counts and effective lengths.
///
/// Transcripts with `eff_len <= 0` get 0. When no transcript has a positive
/// rate every entry is 0.
pub fn derive_tpm(records: &[OracleRecord]) -> Vec<f64> {
    let rates: Vec<f64> = records
        .iter()
        .map(|r| if r.eff_len > 0.0 { r.counts as f64 / r.eff_len } else { 0.0 })
        .collect();
    let total: f64 = rates.iter().sum();
    if total <= 0.0 {
        return vec![0.0; records.len()];
    }
    rates.into_iter().map(|rate| rate / total * TPM_TOTAL).collect()
}

/// Round a simulated count to whole reads, half to even. `None` for
/// negative or non-finite input.
fn round_counts(counts: f64) -> Option<u64> {
    if counts.is_finite() && counts >= 0.0 { Some(counts.round_ties_even() as u64) } else { None }
}
