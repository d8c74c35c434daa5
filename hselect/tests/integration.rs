//! Integration tests for the hselect CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn hselect_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hselect"));
    // Keep the user's config and log filter out of the tests
    cmd.env("HSELECT_CONFIG", dir.join("no-config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    hselect_cmd(dir).args(args).output().expect("failed to run hselect")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Three single-extension sources: A=4.5, A=10.55, A=200 with B="x".
fn three_records(dir: &Path) -> Vec<String> {
    vec![
        write(dir, "r1.json", r#"{"A": 4.5}"#),
        write(dir, "r2.json", r#"{"A": 10.55}"#),
        write(dir, "r3.toml", "A = 200.0\nB = \"x\"\n"),
    ]
    .into_iter()
    .map(|p| p.display().to_string())
    .collect()
}

#[test]
fn test_select_tsv() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());

    let mut args = vec!["select"];
    args.extend(files.iter().map(String::as_str));
    args.extend(["A,B", "-f", "tsv"]);
    let output = run(tmp.path(), &args);

    assert!(output.status.success(), "hselect failed: {:?}", output);
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Filename\tExt\tA\tB");
    assert_eq!(lines[1], format!("{}\t0\t4.5\t--", files[0]));
    assert_eq!(lines[2], format!("{}\t0\t10.55\t--", files[1]));
    assert_eq!(lines[3], format!("{}\t0\t200.0\tx", files[2]));
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_select_with_expression() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());

    let mut args = vec!["select"];
    args.extend(files.iter().map(String::as_str));
    args.extend(["A,B", "-x", "A<10", "-f", "tsv", "--no-header"]);
    let output = run(tmp.path(), &args);

    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{}\t0\t4.5\n", files[0]));
}

#[test]
fn test_select_json() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());

    let mut args = vec!["select"];
    args.extend(files.iter().map(String::as_str));
    args.extend(["A,B", "--format", "json"]);
    let output = run(tmp.path(), &args);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.trim_start().starts_with('['));
    assert!(out.contains("\"B\": null"));
    assert!(out.contains("\"B\": \"x\""));
}

#[test]
fn test_select_table_with_extensions_and_glob() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "icz1_flt.json",
        r#"[{"NAXIS": 0, "FILENAME": "icz1_flt.fits"}, {"NAXIS": 2, "NAXIS1": 1014, "BUNIT": "ELECTRONS"}]"#,
    );
    write(
        tmp.path(),
        "icz2_flt.toml",
        "[[extension]]\nNAXIS = 0\n\n[[extension]]\nNAXIS = 2\nNAXIS1 = 512\n",
    );
    write(tmp.path(), "notes.txt", "not a header");

    let pattern = tmp.path().join("icz*_flt.*");
    let output = run(
        tmp.path(),
        &["select", pattern.to_str().unwrap(), "NAXIS*,BUNIT", "-e", "1", "--placeholder", "INDEF"],
    );

    assert!(output.status.success(), "hselect failed: {:?}", output);
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Filename"));
    assert!(lines[0].contains("NAXIS1"));
    assert!(lines[1].starts_with("---"));
    assert!(lines[2].contains("icz1_flt.json") && lines[2].contains("ELECTRONS"));
    assert!(lines[3].contains("icz2_flt.toml") && lines[3].contains("INDEF"));
}

#[test]
fn test_unreadable_source_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let good = write(tmp.path(), "good.json", r#"{"A": 1}"#);
    let bad = write(tmp.path(), "bad.json", "{not json");

    let output = run(
        tmp.path(),
        &["select", good.to_str().unwrap(), bad.to_str().unwrap(), "A", "-f", "tsv"],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("good.json"));
    assert!(!stdout(&output).contains("bad.json"));
    assert!(stderr(&output).contains("skipped"));
}

#[test]
fn test_bad_expression_fails() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());

    let output = run(tmp.path(), &["select", &files[0], "A", "-x", "A < (10"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("Error: Invalid expression"));
}

#[test]
fn test_no_sources_fails() {
    let tmp = TempDir::new().unwrap();
    let pattern = tmp.path().join("*.json");

    let output = run(tmp.path(), &["select", pattern.to_str().unwrap(), "A"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No sources matched"));
}

#[test]
fn test_list_file_source() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());
    let list = write(tmp.path(), "inputs.lis", &format!("# inputs\n{}\n{}\n", files[1], files[0]));

    let output = run(
        tmp.path(),
        &["select", &format!("@{}", list.display()), "A", "-f", "tsv", "--no-header"],
    );

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    // Rows are sorted regardless of list order
    assert!(lines[0].starts_with(&files[0]));
}

#[test]
fn test_check_prints_canonical_form() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["check", "a=1 or b=2 and c='x'"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "(a = 1.0 OR (b = 2.0 AND c = 'x'))");
}

#[test]
fn test_check_reports_parse_error() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["check", "a == 1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("Error:"));
}

#[test]
fn test_keys_listing() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "a.json",
        r#"[{"SIMPLE": true, "COMMENT": ["x"]}, {"FILETYPE": "SCI", "FILENAME": "a.fits", "HISTORY": "y"}]"#,
    );
    let source = path.display().to_string();

    let output = run(tmp.path(), &["keys", &source]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("{s}[0]: SIMPLE COMMENT\n{s}[1]: FILETYPE FILENAME HISTORY\n", s = source)
    );

    let output = run(tmp.path(), &["keys", &source, "-p", "*", "-e", "1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{}[1]: FILENAME FILETYPE\n", source));
}

#[test]
fn test_config_file_defaults() {
    let tmp = TempDir::new().unwrap();
    let files = three_records(tmp.path());
    let config = write(tmp.path(), "config.toml", "placeholder = \"INDEF\"\nformat = \"tsv\"\nheader = false\n");

    let mut args = vec!["select"];
    args.extend(files.iter().map(String::as_str));
    args.push("A,B");
    let output = hselect_cmd(tmp.path())
        .env("HSELECT_CONFIG", &config)
        .args(&args)
        .output()
        .expect("failed to run hselect");

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().next(), Some(format!("{}\t0\t4.5\tINDEF", files[0]).as_str()));
}

#[test]
fn test_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config = write(tmp.path(), "config.toml", "jobs = 0\n");

    let output = hselect_cmd(tmp.path())
        .env("HSELECT_CONFIG", &config)
        .args(["check", "A = 1"])
        .output()
        .expect("failed to run hselect");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Configuration error"));
}

#[test]
fn test_parallel_jobs() {
    let tmp = TempDir::new().unwrap();
    for i in 0..12 {
        write(tmp.path(), &format!("s{:02}.json", i), &format!(r#"{{"IDX": {}}}"#, i));
    }
    let pattern = tmp.path().join("s*.json");

    let sequential = run(tmp.path(), &["select", pattern.to_str().unwrap(), "IDX", "-f", "tsv"]);
    let parallel = run(tmp.path(), &["select", pattern.to_str().unwrap(), "IDX", "-f", "tsv", "-j", "4"]);

    assert!(parallel.status.success());
    assert_eq!(stdout(&sequential), stdout(&parallel));
    assert_eq!(stdout(&parallel).lines().count(), 13);
}

#[test]
fn test_glob_in_missing_directory_does_not_abort() {
    let tmp = TempDir::new().unwrap();
    let good = write(tmp.path(), "good.json", r#"{"A": 1}"#);
    let missing = tmp.path().join("no_such_dir").join("*.json");

    let output = run(
        tmp.path(),
        &["select", good.to_str().unwrap(), missing.to_str().unwrap(), "A", "-f", "tsv", "--no-header"],
    );

    assert!(output.status.success(), "hselect failed: {:?}", output);
    assert_eq!(stdout(&output), format!("{}\t0\t1.0\n", good.display()));
}

#[test]
fn test_long_option_aliases() {
    let tmp = TempDir::new().unwrap();
    let path = write(tmp.path(), "multi.json", r#"[{"A": 1}, {"A": 20}, {"A": 300}]"#);
    let source = path.display().to_string();

    let output = run(
        tmp.path(),
        &["select", &source, "A", "--ext", "1,2", "--expression", "A < 100", "-f", "tsv", "--no-header"],
    );

    assert!(output.status.success(), "hselect failed: {:?}", output);
    assert_eq!(stdout(&output), format!("{}\t1\t20.0\n", source));
}

#[test]
fn test_check_large_and_small_numbers_reparse() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["check", "A = 100000000000000000000 OR B < 0.00001"]);
    assert!(output.status.success());
    let canonical = stdout(&output).trim().to_string();
    assert_eq!(canonical, "(A = 100000000000000000000.0 OR B < 0.00001)");

    let output = run(tmp.path(), &["check", &canonical]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), canonical);
}
