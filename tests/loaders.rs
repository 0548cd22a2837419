use quant_oracle::cli::{parse_positive, parse_quant_spec};
use quant_oracle::fasta::load_reference_ids;
use quant_oracle::quant::{detect_format, load_quant, QuantFormat};
use quant_oracle::truth::load_truth;
use quant_oracle::QuantRecord;
use std::fs;
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write test input");
    path
}

#[test]
fn fasta_ids_are_first_header_token() {
    let dir = tempfile::tempdir().unwrap();
    let fa = write(
        dir.path(),
        "ref.fa",
        ">ENST00000456328.2 gene=DDX11L1\nACGTACGT\n>T2\nGGCC\nAATT\n",
    );
    let ids = load_reference_ids(&fa).unwrap();
    assert_eq!(ids, vec!["ENST00000456328.2".to_string(), "T2".to_string()]);
}

#[test]
fn truth_with_and_without_header() {
    let dir = tempfile::tempdir().unwrap();
    let with_header = write(
        dir.path(),
        "truth_h.tsv",
        "target_id\tlength\ttpm\tfpkm\tcounts\nT1\t300\t12.5\t3.0\t10.4\n",
    );
    let bare = write(dir.path(), "truth.tsv", "T1\t300\t12.5\t3.0\t10.4\textra\nT2\t200\t0\t0\t0\n");

    let a = load_truth(&with_header).unwrap();
    let b = load_truth(&bare).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert_eq!(a[0], b[0]);
    assert_eq!(a[0].target_id, "T1");
    assert_eq!(a[0].length, 300.0);
    assert_eq!(a[0].counts, 10.4);
}

#[test]
fn truth_rejects_short_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.tsv", "T1\t300\t1.0\n");
    assert!(load_truth(&path).is_err());
}

#[test]
fn kallisto_and_salmon_tables() {
    let dir = tempfile::tempdir().unwrap();
    let kal = write(
        dir.path(),
        "abundance.tsv",
        "target_id\tlength\teff_length\test_counts\ttpm\nT1\t300\t51.2\t9.5\t900000\nT2\t200\t12.0\t1\t100000\n",
    );
    let sal = write(
        dir.path(),
        "quant.sf",
        "Name\tLength\tEffectiveLength\tTPM\tNumReads\nT1\t300\t50.0\t1000000\t10.000\n",
    );

    assert_eq!(detect_format(&kal).unwrap(), QuantFormat::Kallisto);
    assert_eq!(detect_format(&sal).unwrap(), QuantFormat::Salmon);
    assert!(detect_format(Path::new("estimates.txt")).is_err());

    assert_eq!(
        load_quant(&kal, None).unwrap(),
        vec![QuantRecord::new("T1", 900000.0, 9.5), QuantRecord::new("T2", 100000.0, 1.0)]
    );
    assert_eq!(load_quant(&sal, None).unwrap(), vec![QuantRecord::new("T1", 1e6, 10.0)]);
}

#[test]
fn generic_table_requires_explicit_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "est.tsv", "target_id\ttpm\test_counts\nT1\t5\t2\n");
    assert!(load_quant(&path, None).is_err());
    assert_eq!(
        load_quant(&path, Some(QuantFormat::Generic)).unwrap(),
        vec![QuantRecord::new("T1", 5.0, 2.0)]
    );
}

#[test]
fn negative_estimates_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "est.tsv", "target_id\ttpm\test_counts\nT1\t-5\t2\n");
    assert!(load_quant(&path, Some(QuantFormat::Generic)).is_err());
}

#[test]
fn quant_spec_parsing() {
    let spec = parse_quant_spec("kallisto:kallisto=run1/abundance.tsv").unwrap();
    assert_eq!(spec.name, "kallisto");
    assert_eq!(spec.format, Some(QuantFormat::Kallisto));
    assert_eq!(spec.path, PathBuf::from("run1/abundance.tsv"));

    let spec = parse_quant_spec("salmon=quant.sf").unwrap();
    assert_eq!(spec.format, None);

    assert!(parse_quant_spec("no-path").is_err());
    assert!(parse_quant_spec("x:bogus=a.tsv").is_err());
    assert!(parse_quant_spec("=a.tsv").is_err());
}

#[test]
fn log_offset_must_be_positive() {
    assert_eq!(parse_positive("0.5").unwrap(), 0.5);
    assert_eq!(parse_positive("1").unwrap(), 1.0);
    assert!(parse_positive("0").is_err());
    assert!(parse_positive("-1").is_err());
    assert!(parse_positive("NaN").is_err());
    assert!(parse_positive("inf").is_err());
    assert!(parse_positive("one").is_err());
}
