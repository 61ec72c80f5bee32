//! Result filename parsing
//!
//! Result files are named by underscore-joined components:
//! `<model>_<detail>_<method>_<test>.csv`, where `<detail>` is `detailed` or
//! `summary`. The model component may itself contain underscores, so parsing
//! anchors on the detail component.

use std::sync::OnceLock;

use regex::Regex;

use crate::dataset::DetailLevel;

/// Parsed components of a result filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFileName {
    /// Normalized model display name
    pub model: String,
    /// Detail level component
    pub detail: DetailLevel,
    /// Prompting method component
    pub method: String,
    /// Test set name component
    pub test: String,
}

fn result_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<model>.+)_(?P<detail>detailed|summary)_(?P<method>[^_]+)_(?P<test>[^_]+)$")
            .expect("result filename regex is valid")
    })
}

/// Parse a result file stem (filename without `.csv`).
///
/// Returns `None` when the stem does not follow the naming convention.
pub fn parse_result_stem(stem: &str) -> Option<ResultFileName> {
    let caps = result_name_re().captures(stem)?;
    let detail = caps["detail"].parse::<DetailLevel>().ok()?;
    Some(ResultFileName {
        model: normalize_model_name(&caps["model"]),
        detail,
        method: caps["method"].to_string(),
        test: caps["test"].to_string(),
    })
}

/// Extract the test set name from a `testset_<name>` file stem.
pub fn parse_testset_stem(stem: &str) -> Option<&str> {
    stem.strip_prefix("testset_").filter(|name| !name.is_empty())
}

/// Normalize a raw model name component to its display name.
///
/// Version digits separated by a hyphen collapse to a dot, so
/// `Claude-3-5-Sonnet` displays as `Claude-3.5-Sonnet` while `GPT-4o-Mini`
/// stays untouched.
pub fn normalize_model_name(raw: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d)-(\d)").expect("version regex is valid"));

    let mut name = raw.to_string();
    // Repeat until fixed point: Claude-3-5-1 -> Claude-3.5.1
    loop {
        let replaced = re.replace_all(&name, "$1.$2").into_owned();
        if replaced == name {
            return name;
        }
        name = replaced;
    }
}
