//! quant-oracle: score transcript quantification tools against the ground
//! truth of a simulated RNA-seq experiment.
//!
//! # Library usage
//!
//! ```no_run
//! use quant_oracle::{compare, CompareConfig, Method, MethodEstimates, RowFilter};
//! use quant_oracle::{fasta, quant, truth};
//!
//! // let reference_ids = fasta::load_reference_ids(path_to_fasta)?;
//! // let truth = truth::load_truth(path_to_truth_tsv)?;
//! // let salmon = quant::load_quant(path_to_quant_sf, None)?;
//! //
//! // let config = CompareConfig::default();
//! // let methods = vec![MethodEstimates::new(Method::new("salmon")?, salmon)];
//! // let comparison = compare(&reference_ids, &truth, methods, None, &config)?;
//! // for (metric, subset, reports) in comparison.summaries(&RowFilter::default(), &config)? {
//! //     /* … */
//! // }
//! ```

// Public modules — stable API surface.
pub mod cli;
pub mod config;
pub mod error;
pub mod fasta;
pub mod merge;
pub mod oracle;
pub mod pipeline;
pub mod quant;
pub mod report;
pub mod stats;
pub mod summary;
pub mod truth;
pub mod types;

mod api;

// Flat re-exports for the most commonly used public types.
pub use api::{compare, Comparison};
pub use config::CompareConfig;
pub use error::CompareError;
pub use merge::{average_replicates, merge_methods, ComparisonRow, ComparisonTable, Method, MethodEstimates};
pub use oracle::{build_oracle, derive_tpm, Oracle, OracleRecord, OracleWarning};
pub use stats::{rel_diff, rel_err};
pub use summary::{summarize, summarize_with, PercentErrorStats, RowFilter, Subset, SummaryReport};
pub use truth::TruthRecord;
pub use types::{Metric, QuantRecord, TPM_TOTAL};
