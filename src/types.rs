use serde::Serialize;
use std::fmt;

// Fast hash maps / sets using AHash instead of the default SipHash.
// Import these throughout the codebase with `use crate::types::{HashMap, HashSet}`.
// Also import `HashMapExt` / `HashSetExt` when you need `::new()` or `::with_capacity()`.
pub(crate) type HashMap<K, V> = ahash::HashMap<K, V>;
pub(crate) type HashSet<K> = ahash::HashSet<K>;
pub(crate) use ahash::HashMapExt;
pub(crate) use ahash::HashSetExt;

/// TPM columns are normalised to this total.
pub const TPM_TOTAL: f64 = 1e6;

/// One quantification row for a transcript, as reported by a single method run.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantRecord {
    pub target_id: String,
    pub tpm: f64,
    pub est_counts: f64,
}

impl QuantRecord {
    pub fn new(target_id: impl Into<String>, tpm: f64, est_counts: f64) -> Self {
        Self { target_id: target_id.into(), tpm, est_counts }
    }
}

/// Quantity being compared against the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Tpm,
    EstCounts,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Tpm, Metric::EstCounts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Tpm => "tpm",
            Metric::EstCounts => "est_counts",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rescale `values` in place so they sum to [`TPM_TOTAL`].
///
/// An all-zero (or empty) column is left untouched.
pub fn rescale_to_tpm(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v = *v / total * TPM_TOTAL;
        }
    }
}
