use thiserror::Error;

/// Validation failures that abort a comparison run.
///
/// Numeric edge cases (zero denominators, empty subsets) never show up here;
/// they are carried as missing values in the computed tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("no reference identifier matches the ground truth table ({n_reference} reference, {n_truth} truth identifiers)")]
    IdentifierMismatch { n_reference: usize, n_truth: usize },

    #[error("replicate {replicate} is not aligned with replicate 0 at row {position}: {detail}")]
    ReplicateMisalignment { replicate: usize, position: usize, detail: String },

    #[error("length mismatch: {oracle} oracle values vs {estimate} estimates")]
    LengthMismatch { oracle: usize, estimate: usize },

    #[error("invalid method name {0:?}: must be non-empty and not a reserved column name")]
    UnknownMethod(String),

    #[error("method {0:?} given more than once")]
    DuplicateMethod(String),

    #[error("method {method:?} reports transcript {target_id:?} more than once")]
    DuplicateIdentifier { method: String, target_id: String },
}
