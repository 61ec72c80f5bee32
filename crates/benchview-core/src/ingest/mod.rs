//! Data directory ingestion
//!
//! A data directory holds two CSV families side by side:
//! - `testset_<name>.csv` - one per test set, question metadata
//! - `<model>_<detail>_<method>_<test>.csv` - one per evaluation run
//!
//! Unreadable or nonconforming files are skipped with a warning; a load only
//! fails outright when the directory itself is missing.

pub mod encoding;
pub mod naming;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::dataset::{
    Dataset, EvaluationRecord, LoadReport, QuestionKey, SkippedFile, TestQuestion, TestSet,
};
use crate::error::{BenchError, Result};

use self::encoding::read_with_fallback;
use self::naming::{parse_result_stem, parse_testset_stem};

/// Load every test set and result file under `dir`.
pub fn load_dataset(dir: &Path, config: &Config) -> Result<Dataset> {
    if !dir.is_dir() {
        return Err(BenchError::DataDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut csv_files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    // Directory iteration order is platform-dependent; sort for stable output.
    csv_files.sort();

    let mut report = LoadReport::default();
    let mut test_sets = BTreeMap::new();
    let mut result_paths = Vec::new();

    for path in csv_files {
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        if let Some(name) = parse_testset_stem(&stem) {
            match load_testset(&path, name, config) {
                Ok(test_set) => {
                    debug!(test = name, questions = test_set.questions.len(), "loaded testset");
                    test_sets.insert(name.to_string(), test_set);
                    report.testset_files += 1;
                }
                Err(e) => skip(&mut report, &path, e.to_string()),
            }
        } else {
            result_paths.push(path);
        }
    }

    let mut records = Vec::new();
    for path in result_paths {
        match load_result_file(&path, &test_sets, config) {
            Ok(mut file_records) => {
                debug!(path = %path.display(), records = file_records.len(), "loaded results");
                records.append(&mut file_records);
                report.result_files += 1;
            }
            Err(e) => skip(&mut report, &path, e.to_string()),
        }
    }

    Ok(Dataset {
        test_sets,
        records,
        load_report: report,
        loaded_at: Utc::now(),
    })
}

fn skip(report: &mut LoadReport, path: &Path, reason: String) {
    warn!(path = %path.display(), reason = %reason, "skipping file");
    report.skipped.push(SkippedFile {
        path: path.to_path_buf(),
        reason,
    });
}

/// Case-insensitive header lookup, first match over the candidate names wins.
fn header_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    for name in names {
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
        {
            return Some(idx);
        }
    }
    None
}

fn field<'a>(record: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn load_testset(path: &Path, name: &str, config: &Config) -> Result<TestSet> {
    let (text, _) = read_with_fallback(path, config.fallback_encoding())?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let number_idx = header_index(&headers, &["Question"])
        .ok_or_else(|| BenchError::failed("read testset", "missing Question column"))?;
    let subject_idx = header_index(&headers, &["Subject"]);
    let year_idx = header_index(&headers, &["Year"]);
    let session_idx = header_index(&headers, &["Session"]);
    let law_idx = header_index(&headers, &["law"]);
    let answer_idx = header_index(&headers, &["Answer"]);

    let mut questions = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let Some(number) = field(&record, Some(number_idx)).and_then(|v| v.parse::<u32>().ok())
        else {
            warn!(path = %path.display(), row, "skipping row without a question number");
            continue;
        };
        questions.push(TestQuestion {
            number,
            subject: field(&record, subject_idx).map(String::from),
            year: field(&record, year_idx).and_then(|v| v.parse().ok()),
            session: field(&record, session_idx).map(String::from),
            is_law: field(&record, law_idx).map(|v| v == "O"),
            answer: field(&record, answer_idx).map(String::from),
        });
    }

    Ok(TestSet {
        name: name.to_string(),
        questions,
    })
}

fn load_result_file(
    path: &Path,
    test_sets: &BTreeMap<String, TestSet>,
    config: &Config,
) -> Result<Vec<EvaluationRecord>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| BenchError::failed("read results", "non-UTF-8 filename"))?;
    let parsed = parse_result_stem(stem).ok_or_else(|| {
        BenchError::failed(
            "read results",
            "filename does not match <model>_<detail>_<method>_<test>",
        )
    })?;

    let (text, used_encoding) = read_with_fallback(path, config.fallback_encoding())?;
    if used_encoding != "utf-8" {
        debug!(path = %path.display(), encoding = used_encoding, "decoded with fallback encoding");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let number_idx = header_index(&headers, &["Question"])
        .ok_or_else(|| BenchError::failed("read results", "missing Question column"))?;
    let predicted_idx = header_index(&headers, &["predicted_answer"]);
    let correct_idx = header_index(&headers, &["correct_answer", "Answer"]);
    let input_tokens_idx = header_index(&headers, &["input_tokens"]);
    let output_tokens_idx = header_index(&headers, &["output_tokens"]);
    let time_idx = header_index(&headers, &["response_time_seconds"]);

    let test_set = test_sets.get(&parsed.test);
    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let Some(number) = field(&record, Some(number_idx)).and_then(|v| v.parse::<u32>().ok())
        else {
            warn!(path = %path.display(), row, "skipping row without a question number");
            continue;
        };

        let question = test_set.and_then(|ts| ts.question(number));
        let predicted_answer = field(&record, predicted_idx).map(String::from);
        let correct_answer = field(&record, correct_idx)
            .map(String::from)
            .or_else(|| question.and_then(|q| q.answer.clone()));
        let is_correct = EvaluationRecord::derive_correct(
            predicted_answer.as_deref(),
            correct_answer.as_deref(),
        );

        records.push(EvaluationRecord {
            key: QuestionKey {
                test: parsed.test.clone(),
                year: question.and_then(|q| q.year),
                session: question.and_then(|q| q.session.clone()),
                number,
            },
            model: parsed.model.clone(),
            detail: parsed.detail,
            method: parsed.method.clone(),
            predicted_answer,
            correct_answer,
            is_correct,
            subject: question.and_then(|q| q.subject.clone()),
            is_law: question.and_then(|q| q.is_law),
            input_tokens: field(&record, input_tokens_idx).and_then(|v| v.parse().ok()),
            output_tokens: field(&record, output_tokens_idx).and_then(|v| v.parse().ok()),
            response_time_secs: field(&record, time_idx).and_then(|v| v.parse().ok()),
        });
    }

    Ok(records)
}
