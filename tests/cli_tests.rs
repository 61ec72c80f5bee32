mod common;

use common::{benchview, write_fixture};
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_reports_testsets_and_models() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("CPA-2023: 4 questions"))
        .stdout(predicate::str::contains("GPT-4o"))
        .stdout(predicate::str::contains("Claude-3.5-Sonnet"));
}

#[test]
fn test_validate_json() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let output = benchview()
        .args(["--format", "json", "--data-dir"])
        .arg(dir.path())
        .arg("validate")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["test_sets"].as_array().unwrap().len(), 1);
    assert_eq!(value["models"].as_array().unwrap().len(), 3);
    assert_eq!(value["skipped"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_empty_dir_warns() {
    let dir = tempdir().unwrap();

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("no testset files found"))
        .stdout(predicate::str::contains("no result files found"));
}

#[test]
fn test_validate_reports_skipped_files() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::write(dir.path().join("notes.csv"), "a,b\n1,2\n").unwrap();

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped files:"))
        .stdout(predicate::str::contains("notes.csv"));
}

// ============================================================================
// summary / accuracy / inventory
// ============================================================================

#[test]
fn test_summary_accuracy_values() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("75.0%"))
        .stdout(predicate::str::contains("50.0%"))
        .stdout(predicate::str::contains("25.0%"));
}

#[test]
fn test_summary_model_filter() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["summary", "--model", "GPT-4o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPT-4o"))
        .stdout(predicate::str::contains("Claude-3.5-Sonnet").not());
}

#[test]
fn test_summary_records_format() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--format", "records", "--data-dir"])
        .arg(dir.path())
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("M GPT-4o runs=1 questions=4 correct=3"));
}

#[test]
fn test_accuracy_by_subject() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["accuracy", "--by", "subject"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Audit"))
        .stdout(predicate::str::contains("Tax"));
}

#[test]
fn test_accuracy_by_law_with_filter() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // q1 (law) and q4 (law): GPT-4o got q1 right, q4 wrong
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["accuracy", "--by", "law", "--model", "GPT-4o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("law"))
        .stdout(predicate::str::contains("50.0% (1/2)"));
}

#[test]
fn test_accuracy_rejects_unknown_dimension() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["accuracy", "--by", "difficulty"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_models_listing_is_sorted() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let output = benchview()
        .args(["--format", "records", "--data-dir"])
        .arg(dir.path())
        .arg("models")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let models: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        models,
        vec!["M Claude-3.5-Sonnet", "M GPT-4o", "M GPT-4o-Mini"]
    );
}

#[test]
fn test_tests_listing() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("tests")
        .assert()
        .success()
        .stdout(predicate::str::contains("CPA-2023 (4 questions, 2 law)"));
}

// ============================================================================
// tokens / timing
// ============================================================================

#[test]
fn test_tokens_totals() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("GPT-4o"))
        .stdout(predicate::str::contains("4600"))
        .stdout(predicate::str::contains("860"));
}

#[test]
fn test_tokens_cost_from_config() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::write(
        dir.path().join("benchview.toml"),
        "[pricing.\"GPT-4o\"]\ninput_per_mtok = 1000000.0\noutput_per_mtok = 0.0\n",
    )
    .unwrap();

    // 4600 input tokens at $1e6 per Mtok = $4600.00
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("$4600.00"));
}

#[test]
fn test_timing_summary() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("timing")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.25"))
        .stdout(predicate::str::contains("1.50"))
        .stdout(predicate::str::contains("3.00"));
}

// ============================================================================
// ensemble
// ============================================================================

#[test]
fn test_ensemble_majority() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // GPT-4o + GPT-4o-Mini majority: q1 A/A -> A ok; q2 B/C tie -> B ok;
    // q3 D/A tie -> A wrong; q4 C/C -> C wrong. 2/4 correct.
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args([
            "ensemble",
            "--model",
            "GPT-4o",
            "--model",
            "GPT-4o-Mini",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("questions: 4"))
        .stdout(predicate::str::contains("accuracy: 50.0%"));
}

#[test]
fn test_ensemble_weighted_follows_stronger_model() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // GPT-4o (0.75) outweighs GPT-4o-Mini (0.25) on every disagreement:
    // q1 A ok, q2 B ok, q3 D ok, q4 C wrong -> 3/4
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args([
            "ensemble",
            "--model",
            "GPT-4o",
            "--model",
            "GPT-4o-Mini",
            "--method",
            "weighted",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("accuracy: 75.0%"));
}

#[test]
fn test_ensemble_records_output() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--format", "records", "--data-dir"])
        .arg(dir.path())
        .args([
            "ensemble",
            "--model",
            "GPT-4o",
            "--model",
            "Claude-3.5-Sonnet",
            "--records",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("E Ensemble-majority"))
        .stdout(predicate::str::contains(
            "Q CPA-2023/2023/1/Q4 predicted=C answer=D ok=false",
        ));
}

#[test]
fn test_ensemble_requires_two_constituents() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["ensemble", "--model", "GPT-4o"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("at least 2"));
}

#[test]
fn test_ensemble_unknown_model_is_data_error() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["ensemble", "--model", "GPT-4o", "--model", "Nope"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("model not found"));
}

// ============================================================================
// wrong-answers
// ============================================================================

#[test]
fn test_wrong_answers_patterns() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // q4: 3/3 wrong, all C. q3: 2/3 wrong, both A. Both complete.
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("wrong-answers")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 patterns (2 complete, 0 partial)"))
        .stdout(predicate::str::contains("CPA-2023/2023/1/Q4"))
        .stdout(predicate::str::contains("CPA-2023/2023/1/Q3"));
}

#[test]
fn test_wrong_answers_orders_by_incorrect_rate() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let output = benchview()
        .args(["--format", "records", "--data-dir"])
        .arg(dir.path())
        .arg("wrong-answers")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    // q4 (rate 1.0) sorts before q3 (rate 0.667)
    assert!(lines[0].starts_with("P CPA-2023/2023/1/Q4"));
    assert!(lines[1].starts_with("P CPA-2023/2023/1/Q3"));
}

#[test]
fn test_wrong_answers_json_and_idempotence() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let run = || {
        benchview()
            .args(["--format", "json", "--data-dir"])
            .arg(dir.path())
            .arg("wrong-answers")
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    let patterns = value["patterns"].as_array().unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0]["modal_wrong_answer"], "C");
    assert_eq!(patterns[0]["consistency_ratio"], 1.0);
}

#[test]
fn test_wrong_answers_threshold_excludes() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // Raising the rate floor above 0.667 leaves only q4
    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .args(["wrong-answers", "--min-incorrect-rate", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 patterns (1 complete, 0 partial)"))
        .stdout(predicate::str::contains("Q3").not());
}

// ============================================================================
// errors and encodings
// ============================================================================

#[test]
fn test_missing_data_dir_is_data_error() {
    benchview()
        .args(["--data-dir", "/nonexistent/benchdata", "summary"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("data directory not found"));
}

#[test]
fn test_missing_data_dir_json_envelope() {
    let output = benchview()
        .args([
            "--format",
            "json",
            "--data-dir",
            "/nonexistent/benchdata",
            "summary",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["code"], 3);
    assert_eq!(value["error"]["type"], "data_dir_not_found");
}

#[test]
fn test_empty_dir_summary_is_data_error() {
    let dir = tempdir().unwrap();

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("summary")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("no benchmark data"));
}

#[test]
fn test_cp949_fallback_load() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    // A second test set whose subject column is cp949-encoded ("세법")
    let mut bytes = b"Question,Subject,Year,Session,law,Answer\n".to_vec();
    bytes.extend_from_slice(b"1,");
    bytes.extend_from_slice(&[0xBC, 0xBC, 0xB9, 0xFD]);
    bytes.extend_from_slice(b",2022,1,O,A\n");
    std::fs::write(dir.path().join("testset_CTA-2022.csv"), &bytes).unwrap();

    benchview()
        .args(["--data-dir"])
        .arg(dir.path())
        .arg("tests")
        .assert()
        .success()
        .stdout(predicate::str::contains("CTA-2022 (1 questions, 1 law)"));
}
