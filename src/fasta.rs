use anyhow::Result;
use needletail::parse_fastx_file;
use std::path::Path;

/// Read the transcript identifier universe from a reference FASTA.
///
/// The identifier is the first whitespace-delimited token of each header,
/// which is what quantifiers use as `target_id`. Order follows the file.
pub fn load_reference_ids(path: &Path) -> Result<Vec<String>> {
    let mut reader = parse_fastx_file(path)
        .map_err(|e| anyhow::anyhow!("failed to open FASTA {}: {}", path.display(), e))?;
    let mut ids = Vec::new();

    while let Some(result) = reader.next() {
        let record = result
            .map_err(|e| anyhow::anyhow!("failed to parse FASTA record: {}", e))?;
        let header = std::str::from_utf8(record.id())
            .map_err(|_| anyhow::anyhow!("non UTF-8 FASTA header in {}", path.display()))?;
        let id = header.split_whitespace().next().unwrap_or("");
        if id.is_empty() {
            anyhow::bail!("empty FASTA header in {}", path.display());
        }
        ids.push(id.to_string());
    }

    tracing::debug!(n = ids.len(), path = %path.display(), "loaded reference identifiers");
    Ok(ids)
}
