use quant_oracle::CompareConfig;

/// `CompareConfig::ensembl()` carries the simulation constants used for the
/// Ensembl-based benchmark.
#[test]
fn ensembl_defaults() {
    let cfg = CompareConfig::ensembl();
    assert!((cfg.mean_fragment_length - 250.0).abs() < 1e-12, "mean_fragment_length");
    assert_eq!(cfg.id_width, Some(15),  "id_width");
    assert!((cfg.log_offset - 1.0).abs() < 1e-12, "log_offset");
    assert!(cfg.rescale_tpm,            "rescale_tpm");
}

/// `exact_ids()` only differs in the join key.
#[test]
fn exact_ids_disables_truncation() {
    let cfg = CompareConfig::exact_ids();
    let ens = CompareConfig::ensembl();
    assert_eq!(cfg.id_width, None);
    assert_eq!(cfg.mean_fragment_length, ens.mean_fragment_length);
    assert_eq!(cfg.log_offset,           ens.log_offset);
    assert_eq!(cfg.rescale_tpm,          ens.rescale_tpm);
}

/// `Default` should be equivalent to `ensembl()`.
#[test]
fn default_is_ensembl() {
    let default = CompareConfig::default();
    let ens     = CompareConfig::ensembl();
    assert_eq!(default.mean_fragment_length, ens.mean_fragment_length);
    assert_eq!(default.id_width,             ens.id_width);
    assert_eq!(default.log_offset,           ens.log_offset);
    assert_eq!(default.rescale_tpm,          ens.rescale_tpm);
}

#[test]
fn canonical_id_truncates_version_suffix() {
    let cfg = CompareConfig::default();
    assert_eq!(cfg.canonical_id("ENST00000456328.2"), "ENST00000456328");
    assert_eq!(cfg.canonical_id("ENST00000456328"),   "ENST00000456328");
    assert_eq!(cfg.canonical_id("T1"),                "T1");

    let exact = CompareConfig::exact_ids();
    assert_eq!(exact.canonical_id("ENST00000456328.2"), "ENST00000456328.2");
}
