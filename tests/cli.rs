use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn synthfilter() -> Command {
    let mut cmd = Command::cargo_bin("synthfilter").unwrap();
    cmd.env_remove("SYNTHFILTER_SPREADSHEET")
        .env_remove("SYNTHFILTER_INPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_on(spreadsheet: &Path, input: &Path) -> Command {
    let mut cmd = synthfilter();
    cmd.arg("--spreadsheet").arg(spreadsheet).arg("--input").arg(input);
    cmd
}

#[test]
fn filters_reference_scenario() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\nB2\n");
    let input = write_file(
        &dir,
        "lines.txt",
        b"x;y;z;1;2;3;4;A1\nx;y;z;1;2;3;4;C3\n\"short\";1\n",
    );

    run_on(&spreadsheet, &input)
        .assert()
        .success()
        .stdout(predicate::str::contains("33.3%"))
        .stdout(predicate::str::contains("lines_filtrado.txt"));

    let output = fs::read(dir.path().join("lines_filtrado.txt")).unwrap();
    assert_eq!(output, b"x;y;z;1;2;3;4;A1\n");
}

#[test]
fn quoted_key_field_matches() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nS-001\n");
    let input = write_file(
        &dir,
        "quoted.txt",
        b"\"a\";\"b\";\"c\";\"d\";\"e\";\"f\";\"g\";\"S-001\";\"h\"\n\"a\";\"b\";\"c\";\"d\";\"e\";\"f\";\"g\";\"S-002\";\"h\"\n",
    );

    run_on(&spreadsheet, &input).arg("--quiet").assert().success();

    let output = fs::read(dir.path().join("quoted_filtrado.txt")).unwrap();
    assert_eq!(
        output,
        b"\"a\";\"b\";\"c\";\"d\";\"e\";\"f\";\"g\";\"S-001\";\"h\"\n"
    );
}

#[test]
fn latin1_and_crlf_lines_are_copied_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    // "NIÑO" in UTF-8 in the spreadsheet, Latin-1 in the text file.
    let spreadsheet = write_file(&dir, "ids.csv", "SINTETICOS\nNIÑO\n".as_bytes());
    let matching: &[u8] = b"caf\xe9;2;3;4;5;6;7;NI\xd1O;\xfc\r\n";
    let mut content = matching.to_vec();
    content.extend_from_slice(b"1;2;3;4;5;6;7;NINO\r\n");
    let input = write_file(&dir, "latin.dat", &content);

    run_on(&spreadsheet, &input).arg("--quiet").assert().success();

    let output = fs::read(dir.path().join("latin_filtrado.dat")).unwrap();
    assert_eq!(output, matching);
}

#[test]
fn missing_column_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"OTHER\nA1\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    run_on(&spreadsheet, &input)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SINTETICOS"));

    assert!(!dir.path().join("lines_filtrado.txt").exists());
}

#[test]
fn empty_text_file_has_no_percentage() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\n");
    let input = write_file(&dir, "empty.txt", b"");

    run_on(&spreadsheet, &input).assert().code(5);
}

#[test]
fn one_missing_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    synthfilter()
        .arg("--input")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("spreadsheet"));

    assert!(!dir.path().join("lines_filtrado.txt").exists());
}

#[test]
fn unreadable_spreadsheet_is_a_file_error() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    run_on(&dir.path().join("absent.xlsx"), &input)
        .assert()
        .code(4);
}

#[test]
fn json_output_is_a_report() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\n");
    let input = write_file(
        &dir,
        "lines.txt",
        b"1;2;3;4;5;6;7;A1\n1;2;3;4;5;6;7;B1\n",
    );

    let assert = run_on(&spreadsheet, &input)
        .args(["--output-format", "json", "--quiet"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["summary"]["total_lines"], 2);
    assert_eq!(report["summary"]["matched_lines"], 1);
    assert_eq!(report["identifiers_loaded"], 1);
}

#[test]
fn report_file_is_written() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");
    let report_path = dir.path().join("report.json");

    run_on(&spreadsheet, &input)
        .arg("--quiet")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["summary"]["percentage"], 100.0);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\nB2\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    run_on(&spreadsheet, &input)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Identifiers: 2"))
        .stdout(predicate::str::contains("lines_filtrado.txt"));

    assert!(!dir.path().join("lines_filtrado.txt").exists());
}

#[test]
fn paths_can_come_from_environment() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nA1\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    synthfilter()
        .env("SYNTHFILTER_SPREADSHEET", &spreadsheet)
        .env("SYNTHFILTER_INPUT", &input)
        .arg("--quiet")
        .assert()
        .success();

    assert!(dir.path().join("lines_filtrado.txt").exists());
}

#[test]
fn semicolon_csv_spreadsheet_via_config() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"NAME;SINTETICOS\nx;A1\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");
    let config = write_file(
        &dir,
        "custom.toml",
        b"[spreadsheet]\ncsv_delimiter = \";\"\n",
    );

    run_on(&spreadsheet, &input)
        .arg("--config")
        .arg(&config)
        .arg("--quiet")
        .assert()
        .success();

    assert_eq!(
        fs::read(dir.path().join("lines_filtrado.txt")).unwrap(),
        b"1;2;3;4;5;6;7;A1\n"
    );
}

#[test]
fn generate_config_writes_sample() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("synthfilter.toml");

    synthfilter()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("atomic_write"));
}

#[test]
fn json_stdout_is_one_document_despite_warnings() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\n\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    let assert = run_on(&spreadsheet, &input)
        .args(["--output-format", "json", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no line can match"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["identifiers_loaded"], 0);
    assert_eq!(report["summary"]["matched_lines"], 0);
}

#[test]
fn json_dry_run_prints_the_plan() {
    let dir = TempDir::new().unwrap();
    let spreadsheet = write_file(&dir, "ids.csv", b"SINTETICOS\nB2\nA1\n");
    let input = write_file(&dir, "lines.txt", b"1;2;3;4;5;6;7;A1\n");

    let assert = run_on(&spreadsheet, &input)
        .args(["--output-format", "json", "--dry-run"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let plan: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(plan["dry_run"], true);
    assert_eq!(plan["identifiers"], 2);
    assert_eq!(plan["sample"], serde_json::json!(["A1", "B2"]));
    assert_eq!(plan["input_exists"], true);
    assert_eq!(plan["output_exists"], false);
    assert!(!dir.path().join("lines_filtrado.txt").exists());
}
