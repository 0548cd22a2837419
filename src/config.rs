/// Mean fragment length of the simulated library.
pub const DEFAULT_MEAN_FRAGMENT_LENGTH: f64 = 250.0;

/// Width of a versionless Ensembl transcript id (`ENST` + 11 digits).
pub const ENSEMBL_ID_WIDTH: usize = 15;

#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Subtracted from transcript length to get the effective length.
    pub mean_fragment_length: f64,
    /// Identifiers are cut to this many characters before joining the
    /// reference against the ground truth. `None` joins on the full id.
    pub id_width: Option<usize>,
    /// Added to values before taking logs for the log-scale correlations.
    pub log_offset: f64,
    /// Rescale every method's TPM column to sum to 1e6 before comparison.
    pub rescale_tpm: bool,
}

impl CompareConfig {
    /// Ensembl-style ids where the truth table drops the version suffix.
    pub fn ensembl() -> Self {
        Self {
            mean_fragment_length: DEFAULT_MEAN_FRAGMENT_LENGTH,
            id_width: Some(ENSEMBL_ID_WIDTH),
            log_offset: 1.0,
            rescale_tpm: true,
        }
    }

    /// Reference and truth ids already agree character for character.
    pub fn exact_ids() -> Self {
        Self { id_width: None, ..Self::ensembl() }
    }

    /// Canonical join key for an identifier.
    pub fn canonical_id<'a>(&self, id: &'a str) -> &'a str {
        match self.id_width {
            Some(width) => match id.char_indices().nth(width) {
                Some((byte_idx, _)) => &id[..byte_idx],
                None => id,
            },
            None => id,
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self::ensembl()
    }
}
