//! Text decoding for benchmark CSV files
//!
//! Files are expected to be UTF-8; dumps from older tooling arrive in a
//! single-byte legacy encoding instead (cp949 for the original Korean data).
//! A file that decodes under neither encoding is unreadable and the caller
//! skips it.

use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// Read a file as UTF-8, falling back to the named legacy encoding.
///
/// Returns the decoded contents and the encoding label actually used.
pub fn read_with_fallback(path: &Path, fallback: &str) -> Result<(String, &'static str)> {
    let bytes = fs::read(path)?;

    if let Ok(text) = std::str::from_utf8(&bytes) {
        return Ok((text.to_string(), "utf-8"));
    }

    let encoding = encoding_rs::Encoding::for_label(fallback.as_bytes()).ok_or_else(|| {
        BenchError::invalid_value("fallback encoding", fallback)
    })?;

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(BenchError::failed(
            "decode file",
            format!(
                "{} is valid neither as UTF-8 nor as {}",
                path.display(),
                fallback
            ),
        ));
    }

    Ok((text.into_owned(), encoding.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Question,Answer\n1,A\n").unwrap();

        let (text, encoding) = read_with_fallback(&path, "cp949").unwrap();
        assert!(text.starts_with("Question"));
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_falls_back_to_cp949() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        // "세법" (tax law) in cp949: not valid UTF-8
        let mut bytes = b"Subject\n".to_vec();
        bytes.extend_from_slice(&[0xBC, 0xBC, 0xB9, 0xFD]);
        bytes.push(b'\n');
        fs::write(&path, &bytes).unwrap();

        let (text, encoding) = read_with_fallback(&path, "cp949").unwrap();
        assert!(text.contains("세법"));
        assert_eq!(encoding, "EUC-KR");
    }

    #[test]
    fn test_unknown_fallback_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, [0xFF, 0xFE, 0xFD]).unwrap();

        let err = read_with_fallback(&path, "not-an-encoding").unwrap_err();
        assert!(matches!(err, BenchError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_with_fallback(Path::new("/nonexistent/data.csv"), "cp949").unwrap_err();
        assert!(matches!(err, BenchError::Io(_)));
    }
}
