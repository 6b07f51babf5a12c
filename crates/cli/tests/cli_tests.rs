// Integration tests for the `rmatch` binary.
// Run with: cargo test -p rostermatch-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

fn rmatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rmatch"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn run(args: &[&str]) -> Output {
    rmatch().args(args).output().expect("run rmatch")
}

fn arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn stderr(o: &Output) -> String {
    String::from_utf8_lossy(&o.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// flag
// ---------------------------------------------------------------------------

#[test]
fn flag_writes_every_subject_row() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("updated_students.csv");
    let o = run(&[
        "flag",
        arg(&fixture("district.csv")),
        arg(&fixture("sped.csv")),
        "-o",
        arg(&out),
    ]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "last name,first name,date of birth,grade,is_in_reference\n\
         Lee,Ann,01/01/2005,7,False\n\
         Smith Jr,John,05/01/2010,2,True\n\
         Doe,Cy,,5,False\n\
         Garcia III,Maria Elena,3/15/2009,3,True\n"
    );
    assert!(stderr(&o).contains("2 of 4 subject row(s)"));
}

#[test]
fn flag_custom_column_and_json_summary() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("flagged.csv");
    let o = run(&[
        "flag",
        arg(&fixture("district.csv")),
        arg(&fixture("sped.csv")),
        "-o",
        arg(&out),
        "--flag-column",
        "isspecialed",
        "--json",
    ]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));

    let report: serde_json::Value = serde_json::from_slice(&o.stdout).expect("valid JSON");
    assert_eq!(report["summary"]["mode"], "flag");
    assert_eq!(report["summary"]["matched_rows"], 2);
    assert_eq!(report["summary"]["output_rows"], 4);
    assert_eq!(report["output"], arg(&out));

    let header = std::fs::read_to_string(&out).unwrap();
    assert!(header.starts_with("last name,first name,date of birth,grade,isspecialed\n"));
}

#[test]
fn flag_rejects_key_column_name() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.csv");
    let o = run(&[
        "flag",
        arg(&fixture("district.csv")),
        arg(&fixture("sped.csv")),
        "-o",
        arg(&out),
        "--flag-column",
        "dob",
    ]);
    assert_eq!(o.status.code(), Some(2));
    assert!(!out.exists());
}

// ---------------------------------------------------------------------------
// join
// ---------------------------------------------------------------------------

#[test]
fn join_tab_delimited_reference() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("matched.csv");
    let o = run(&[
        "join",
        arg(&fixture("district.csv")),
        arg(&fixture("sped.tsv")),
        "-o",
        arg(&out),
    ]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "first_name,last_name,dob,grade,case manager\n\
         John,Smith Jr,2010-05-01,2,Ms. Park\n\
         Maria,Garcia III,2009-03-15,3,Mr. Diaz\n"
    );
}

#[test]
fn join_without_matches_writes_nothing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("matched.csv");
    let o = run(&[
        "join",
        arg(&fixture("district.csv")),
        arg(&fixture("other.csv")),
        "-o",
        arg(&out),
        "--json",
    ]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));
    assert!(stderr(&o).contains("no matches found"));
    assert!(!out.exists());

    let report: serde_json::Value = serde_json::from_slice(&o.stdout).unwrap();
    assert!(report["output"].is_null());
    assert_eq!(report["summary"]["output_rows"], 0);
}

// ---------------------------------------------------------------------------
// load failures
// ---------------------------------------------------------------------------

#[test]
fn missing_input_exits_without_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let o = run(&[
        "flag",
        arg(&fixture("district.csv")),
        arg(&fixture("nope.csv")),
        "-o",
        arg(&out),
    ]);
    assert_eq!(o.status.code(), Some(3));
    assert!(stderr(&o).contains("file not found"));
    assert!(!out.exists());
}

#[test]
fn header_not_found_exits_with_hint() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let o = run(&[
        "flag",
        arg(&fixture("grades.csv")),
        arg(&fixture("sped.csv")),
        "-o",
        arg(&out),
    ]);
    assert_eq!(o.status.code(), Some(5));
    let err = stderr(&o);
    assert!(err.contains("header line not found"), "{err}");
    assert!(err.contains("hint:"));
    assert!(!out.exists());
}

#[test]
fn zero_sample_size_is_usage_error() {
    let o = run(&["detect", arg(&fixture("district.csv")), "--sample-size", "0"]);
    assert_eq!(o.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// run / validate
// ---------------------------------------------------------------------------

#[test]
fn run_job_file_resolves_paths_next_to_it() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("job-out.csv");
    let o = run(&["run", arg(&fixture("sped-check.match.toml")), "-o", arg(&out)]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("last name,first name,date of birth,grade,isspecialed\n"));
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn validate_good_job() {
    let o = run(&["validate", arg(&fixture("sped-check.match.toml"))]);
    assert!(o.status.success());
    assert!(stderr(&o).contains("valid: flag job 'SpEd roster check'"));
}

#[test]
fn validate_bad_job() {
    let o = run(&["validate", arg(&fixture("bad-flag-column.match.toml"))]);
    assert_eq!(o.status.code(), Some(11));
    assert!(stderr(&o).contains("collides"));
}

#[test]
fn validate_missing_job() {
    let o = run(&["validate", arg(&fixture("missing.match.toml"))]);
    assert_eq!(o.status.code(), Some(10));
}

// ---------------------------------------------------------------------------
// detect / normalize
// ---------------------------------------------------------------------------

#[test]
fn detect_reports_delimiter_and_header() {
    let o = run(&["detect", arg(&fixture("district.csv")), "--json"]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));

    let report: serde_json::Value = serde_json::from_slice(&o.stdout).unwrap();
    assert_eq!(report["delimiter"], ";");
    assert_eq!(report["header_row"], 3);
    assert!(report["encoding"].is_string());
}

#[test]
fn detect_tab_is_escaped() {
    let o = run(&["detect", arg(&fixture("sped.tsv"))]);
    assert!(o.status.success());
    let stdout = String::from_utf8_lossy(&o.stdout);
    assert!(stdout.contains("delimiter: \\t"), "{stdout}");
    assert!(stdout.contains("header:    line 0"));
}

#[test]
fn normalize_to_stdout() {
    let o = run(&["normalize", arg(&fixture("sped.csv"))]);
    assert!(o.status.success(), "stderr: {}", stderr(&o));
    assert_eq!(
        String::from_utf8_lossy(&o.stdout),
        "program,first_name,last_name,dob\n\
         Speech,John,Smith Jr,2010-05-01\n\
         Resource,Maria,Garcia III,2009-03-15\n\
         Resource,Bob,Ray,2006-02-02\n\
         Resource,Cy,Doe,\n"
    );
}
