//! End to end tests of the `he-eval` binary.
#![allow(unused_crate_dependencies)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_ADDER: &str = "\
INORDER = a b cin;
OUTORDER = sum cout;
x = (a * !b) + (!a * b);
sum = x ^ cin;
g = a * b;
p = x * cin;
cout = g + p;
";

const AND: &str = "INORDER = a b;\nOUTORDER = c;\nc = a * b;\n";

/// Helper to create a test circuit file
fn create_eqn_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Helper to get the he-eval binary
fn he_eval_cmd() -> Command {
    Command::cargo_bin("he-eval").unwrap()
}

#[test]
fn test_help_command() {
    he_eval_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted circuit evaluator"))
        .stdout(predicate::str::contains("--levels"));
}

#[test]
fn test_full_adder() {
    let file = create_eqn_file(FULL_ADDER);

    he_eval_cmd()
        .arg(file.path())
        .args(["-i", "110"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inputs: 3, outputs: 2, gates: 5"))
        .stdout(predicate::str::contains("Depth: 2"))
        .stdout(predicate::str::contains("Colors: "))
        .stdout(predicate::str::contains("input cin = 0"))
        .stdout(predicate::str::contains("output sum = 0"))
        .stdout(predicate::str::contains("output cout = 1"))
        .stdout(predicate::str::contains("Validating... "))
        .stdout(predicate::str::contains("total: "));
}

#[test]
fn test_quiet_prints_only_total() {
    let file = create_eqn_file(FULL_ADDER);

    let out = he_eval_cmd()
        .arg(file.path())
        .arg("-q")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(out).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 1, "{stdout}");
    assert!(lines[0].starts_with("total: "));
}

#[test]
fn test_seeded_runs_agree() {
    let file = create_eqn_file(FULL_ADDER);

    let values = || {
        let out = he_eval_cmd()
            .arg(file.path())
            .args(["--seed", "1234"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("input ") || l.starts_with("output "))
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };

    let first = values();
    assert_eq!(first.len(), 5);
    assert_eq!(first, values());
}

#[test]
fn test_progress_bar() {
    let file = create_eqn_file(FULL_ADDER);

    he_eval_cmd()
        .arg(file.path())
        .args(["-i", "111", "--progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output sum = 1"))
        .stdout(predicate::str::contains("output cout = 1"));
}

#[test]
fn test_exhausted_levels_fail_validation() {
    let file = create_eqn_file(AND);

    he_eval_cmd()
        .arg(file.path())
        .args(["-i", "11", "--levels", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output validation failed"))
        .stderr(predicate::str::contains("`c` decrypted to 0 but shadow is 1"));
}

#[test]
fn test_parse_error() {
    let file = create_eqn_file("INORDER = a;\nOUTORDER = x;\nx = a *;\n");

    he_eval_cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse circuit"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_unsupported_or() {
    let file = create_eqn_file("INORDER = a b c;\nOUTORDER = y;\ny = a + b + c;\n");

    he_eval_cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported OR pattern"));
}

#[test]
fn test_undefined_net() {
    let file = create_eqn_file("INORDER = a;\nOUTORDER = y;\ny = a * ghost;\n");

    he_eval_cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed circuit"));
}

#[test]
fn test_wrong_input_count() {
    let file = create_eqn_file(AND);

    he_eval_cmd()
        .arg(file.path())
        .args(["-i", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 2 input values, got 1"));
}

#[test]
fn test_invalid_input_bits() {
    let file = create_eqn_file(AND);

    he_eval_cmd()
        .arg(file.path())
        .args(["-i", "1x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --inputs"));
}

#[test]
fn test_missing_file() {
    he_eval_cmd()
        .arg("/nonexistent/circuit.eqn")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
