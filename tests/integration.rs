/// End-to-end runs of the quant-oracle binary on a small simulated dataset.
///
/// Inputs are written to a temporary directory; the binary is located through
/// `CARGO_BIN_EXE_quant-oracle`, so `cargo test --test integration` is enough.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// ── helpers ──────────────────────────────────────────────────────────────────

fn quant_oracle_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quant-oracle"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write test input");
    path
}

/// Reference of four transcripts, a truth table covering three of them, a
/// kallisto run and two salmon replicates.
fn dataset(dir: &Path) -> Vec<String> {
    let reference = write(
        dir,
        "ref.fa",
        ">T1 simulated\nACGT\n>T2\nACGT\n>T3\nACGT\n>T4\nACGT\n",
    );
    let truth = write(
        dir,
        "truth.tsv",
        "target_id\tlength\ttpm\tfpkm\tcounts\n\
         T1\t1250\t600000\t1\t100.2\n\
         T2\t2250\t300000\t1\t99.6\n\
         T3\t200\t100000\t1\t3.0\n",
    );
    let kallisto = write(
        dir,
        "abundance.tsv",
        "target_id\tlength\teff_length\test_counts\ttpm\n\
         T1\t1250\t1000\t95\t650000\n\
         T2\t2250\t2000\t105\t350000\n\
         T3\t200\t1\t0\t0\n\
         T4\t900\t650\t0\t0\n",
    );
    let salmon_a = write(
        dir,
        "a.sf",
        "Name\tLength\tEffectiveLength\tTPM\tNumReads\n\
         T1\t1250\t1000\t600000\t100\n\
         T2\t2250\t2000\t300000\t100\n\
         T4\t900\t650\t100000\t2\n",
    );
    let salmon_b = write(
        dir,
        "b.sf",
        "Name\tLength\tEffectiveLength\tTPM\tNumReads\n\
         T1\t1250\t1000\t700000\t110\n\
         T2\t2250\t2000\t300000\t90\n\
         T4\t900\t650\t0\t0\n",
    );

    vec![
        "-r".into(),
        reference.display().to_string(),
        "-t".into(),
        truth.display().to_string(),
        "-Q".into(),
        format!("kallisto={}", kallisto.display()),
        "-Q".into(),
        format!("salmon={}", salmon_a.display()),
        "-Q".into(),
        format!("salmon={}", salmon_b.display()),
        "-q".into(),
    ]
}

fn run_binary(args: &[String], out_dir: &Path) -> Output {
    Command::new(quant_oracle_bin())
        .args(args)
        .arg("-o")
        .arg(out_dir)
        .output()
        .expect("failed to spawn quant-oracle")
}

fn read_tsv(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(|l| l.split('\t').map(str::to_string).collect())
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[test]
fn writes_all_reports() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = dataset(dir.path());
    args.extend(["--min-oracle".to_string(), "0.01".to_string()]);
    let out = dir.path().join("out");

    let output = run_binary(&args, &out);
    assert!(output.status.success(), "quant-oracle failed: {}", String::from_utf8_lossy(&output.stderr));

    let oracle = read_tsv(&out.join("oracle.tsv"));
    assert_eq!(oracle[0], vec!["target_id", "length", "eff_len", "counts", "tpm", "flag"]);
    assert_eq!(oracle.len(), 5);
    // T3 has 3 reads but a negative effective length.
    assert_eq!(oracle[3][0], "T3");
    assert_eq!(oracle[3][5], "nonpositive_eff_len");
    // T4 is not in the truth table.
    assert_eq!(oracle[4][3], "0");

    // generator + kallisto + salmon, four reference transcripts each.
    let tpm = read_tsv(&out.join("tpm_comparison.tsv"));
    assert_eq!(tpm[0], vec!["target_id", "method", "oracle", "estimate", "rel_diff", "rel_err"]);
    assert_eq!(tpm.len(), 1 + 3 * 4);
    let counts = read_tsv(&out.join("counts_comparison.tsv"));
    let salmon_t1 = counts
        .iter()
        .find(|r| r[0] == "T1" && r[1] == "salmon")
        .expect("salmon T1 row");
    // Oracle counts are rounded; salmon replicates (100, 110) are averaged.
    assert_eq!(salmon_t1[2].parse::<f64>().unwrap(), 100.0);
    assert_eq!(salmon_t1[3].parse::<f64>().unwrap(), 105.0);
    let kallisto_t4 = counts
        .iter()
        .find(|r| r[0] == "T4" && r[1] == "kallisto")
        .expect("kallisto T4 row");
    assert_eq!(kallisto_t4[5], "NA");

    let summary = read_tsv(&out.join("summary.tsv"));
    assert_eq!(summary[0][0..3], ["metric", "subset", "method"]);
    // 2 metrics x {all, filtered} x 3 methods
    assert_eq!(summary.len(), 1 + 2 * 2 * 3);
    let methods: Vec<&str> = summary[1..4].iter().map(|r| r[2].as_str()).collect();
    assert_eq!(methods, vec!["generator", "kallisto", "salmon"]);
    assert!(summary.iter().any(|r| r[0] == "est_counts" && r[1] == "filtered"));
}

#[test]
fn truth_series_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = dataset(dir.path());
    args.push("--no-truth-series".into());
    let out = dir.path().join("out");

    let output = run_binary(&args, &out);
    assert!(output.status.success(), "quant-oracle failed: {}", String::from_utf8_lossy(&output.stderr));

    let summary = read_tsv(&out.join("summary.tsv"));
    assert_eq!(summary.len(), 1 + 2 * 2);
    assert!(summary[1..].iter().all(|r| r[1] == "all" && r[2] != "generator"));
}

#[test]
fn misaligned_replicates_abort() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = dataset(dir.path());
    let shuffled = write(
        dir.path(),
        "c.sf",
        "Name\tLength\tEffectiveLength\tTPM\tNumReads\n\
         T2\t2250\t2000\t300000\t100\n\
         T1\t1250\t1000\t600000\t100\n\
         T4\t900\t650\t100000\t2\n",
    );
    args.extend(["-Q".to_string(), format!("salmon={}", shuffled.display())]);
    let out = dir.path().join("out");

    let output = run_binary(&args, &out);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("replicate 2"), "unexpected stderr: {stderr}");
    assert!(!out.join("summary.tsv").exists());
}

#[test]
fn reserved_method_name_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = dataset(dir.path());
    args.extend(["--truth-label".to_string(), "oracle".to_string()]);
    let output = run_binary(&args, &dir.path().join("out"));
    assert!(!output.status.success());
}

#[test]
fn non_positive_log_offset_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = dataset(dir.path());
    args.extend(["--log-offset".to_string(), "0".to_string()]);
    let output = run_binary(&args, &dir.path().join("out"));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("positive"));
}
