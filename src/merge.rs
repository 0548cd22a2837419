use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::oracle::Oracle;
use crate::types::{rescale_to_tpm, HashMap, HashMapExt, HashSet, HashSetExt, Metric, QuantRecord};
use serde::Serialize;
use std::fmt;

/// Column names of the long comparison table that a method may not shadow.
pub const RESERVED_COLUMNS: [&str; 2] = ["oracle", "target_id"];

/// Name of a quantification method, checked against [`RESERVED_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Method(String);

impl Method {
    pub fn new(name: impl Into<String>) -> Result<Self, CompareError> {
        let name = name.into();
        if name.trim().is_empty() || RESERVED_COLUMNS.contains(&name.as_str()) {
            return Err(CompareError::UnknownMethod(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A method's final per-transcript estimates (replicates already averaged).
#[derive(Debug, Clone)]
pub struct MethodEstimates {
    pub method: Method,
    pub records: Vec<QuantRecord>,
}

impl MethodEstimates {
    pub fn new(method: Method, records: Vec<QuantRecord>) -> Self {
        Self { method, records }
    }

    pub fn from_replicates(
        method: Method,
        replicates: &[Vec<QuantRecord>],
    ) -> Result<Self, CompareError> {
        Ok(Self { method, records: average_replicates(replicates)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub target_id: String,
    pub method: Method,
    pub oracle: f64,
    pub estimate: f64,
}

/// All methods' rows for one metric, stacked in method order.
#[derive(Debug, Clone)]
pub struct ComparisonTable {
    pub metric: Metric,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Methods in order of first appearance.
    pub fn methods(&self) -> Vec<&Method> {
        let mut seen: HashSet<&Method> = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if seen.insert(&row.method) {
                out.push(&row.method);
            }
        }
        out
    }

    pub fn rows_for<'a>(&'a self, method: &'a Method) -> impl Iterator<Item = &'a ComparisonRow> + 'a {
        self.rows.iter().filter(move |r| &r.method == method)
    }
}

/// Element-wise mean of replicate estimates.
///
/// Every replicate must list the same identifiers in the same order as the
/// first one; averaging positionally misaligned tables would silently mix
/// transcripts.
pub fn average_replicates(replicates: &[Vec<QuantRecord>]) -> Result<Vec<QuantRecord>, CompareError> {
    let Some((first, rest)) = replicates.split_first() else {
        return Ok(Vec::new());
    };

    for (offset, rep) in rest.iter().enumerate() {
        let replicate = offset + 1;
        if rep.len() != first.len() {
            return Err(CompareError::ReplicateMisalignment {
                replicate,
                position: rep.len().min(first.len()),
                detail: format!("{} rows, expected {}", rep.len(), first.len()),
            });
        }
        if let Some((position, (a, b))) = first
            .iter()
            .zip(rep)
            .enumerate()
            .find(|(_, (a, b))| a.target_id != b.target_id)
        {
            return Err(CompareError::ReplicateMisalignment {
                replicate,
                position,
                detail: format!("{:?} vs {:?}", a.target_id, b.target_id),
            });
        }
    }

    let n = replicates.len() as f64;
    let averaged = first
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let (tpm, counts) = replicates
                .iter()
                .fold((0.0, 0.0), |(t, c), rep| (t + rep[i].tpm, c + rep[i].est_counts));
            QuantRecord::new(rec.target_id.clone(), tpm / n, counts / n)
        })
        .collect();
    Ok(averaged)
}

/// One joined row carrying both metrics.
struct Joined<'a> {
    target_id: &'a str,
    oracle_tpm: f64,
    oracle_counts: f64,
    tpm: f64,
    est_counts: f64,
}

/// Join every method onto the oracle and stack the results, one table per metric.
///
/// The join is anchored on the oracle: reference transcripts a method does not
/// report get an estimate of 0, and transcripts a method reports outside the
/// reference are kept with an oracle value of 0.
pub fn merge_methods(
    oracle: &Oracle,
    methods: &[MethodEstimates],
    config: &CompareConfig,
) -> Result<Vec<ComparisonTable>, CompareError> {
    let mut names: HashSet<&Method> = HashSet::with_capacity(methods.len());
    for m in methods {
        if !names.insert(&m.method) {
            return Err(CompareError::DuplicateMethod(m.method.to_string()));
        }
    }

    let oracle_ids: HashSet<&str> = oracle.records.iter().map(|r| r.target_id.as_str()).collect();
    let mut tables: Vec<ComparisonTable> = Metric::ALL
        .iter()
        .map(|&metric| ComparisonTable { metric, rows: Vec::new() })
        .collect();

    for m in methods {
        let joined = join_method(oracle, &oracle_ids, m, config)?;
        tracing::debug!(method = %m.method, rows = joined.len(), "merged method");
        for table in &mut tables {
            let metric = table.metric;
            table.rows.extend(joined.iter().map(|j| {
                let (oracle_value, estimate) = match metric {
                    Metric::Tpm => (j.oracle_tpm, j.tpm),
                    Metric::EstCounts => (j.oracle_counts, j.est_counts),
                };
                ComparisonRow {
                    target_id: j.target_id.to_string(),
                    method: m.method.clone(),
                    oracle: oracle_value,
                    estimate,
                }
            }));
        }
    }

    Ok(tables)
}

fn join_method<'a>(
    oracle: &'a Oracle,
    oracle_ids: &HashSet<&str>,
    m: &'a MethodEstimates,
    config: &CompareConfig,
) -> Result<Vec<Joined<'a>>, CompareError> {
    let mut tpm: Vec<f64> = m.records.iter().map(|r| r.tpm).collect();
    if config.rescale_tpm {
        rescale_to_tpm(&mut tpm);
    }

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(m.records.len());
    for (i, rec) in m.records.iter().enumerate() {
        if index.insert(rec.target_id.as_str(), i).is_some() {
            return Err(CompareError::DuplicateIdentifier {
                method: m.method.to_string(),
                target_id: rec.target_id.clone(),
            });
        }
    }

    let mut out = Vec::with_capacity(oracle.len());
    for rec in &oracle.records {
        let (est_tpm, est_counts) = index
            .get(rec.target_id.as_str())
            .map_or((0.0, 0.0), |&i| (tpm[i], m.records[i].est_counts));
        out.push(Joined {
            target_id: &rec.target_id,
            oracle_tpm: rec.tpm,
            oracle_counts: rec.counts as f64,
            tpm: est_tpm,
            est_counts,
        });
    }

    let mut unresolved = 0usize;
    for (i, rec) in m.records.iter().enumerate() {
        if oracle_ids.contains(rec.target_id.as_str()) {
            continue;
        }
        unresolved += 1;
        out.push(Joined {
            target_id: &rec.target_id,
            oracle_tpm: 0.0,
            oracle_counts: 0.0,
            tpm: tpm[i],
            est_counts: rec.est_counts,
        });
    }
    if unresolved > 0 {
        tracing::warn!(method = %m.method, unresolved, "transcripts missing from the reference, compared against zero truth");
    }

    Ok(out)
}
