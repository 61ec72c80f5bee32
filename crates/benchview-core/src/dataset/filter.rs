//! Record filtering
//!
//! Filter state is an explicit value passed into each analysis call. Empty
//! selections mean "no restriction" so that an untouched filter passes every
//! record through.

use super::{DetailLevel, EvaluationRecord};

/// Filter configuration for evaluation records
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Restrict to these test sets
    pub tests: Vec<String>,
    /// Restrict to these models
    pub models: Vec<String>,
    /// Restrict to these subjects
    pub subjects: Vec<String>,
    /// Restrict to these years
    pub years: Vec<i32>,
    /// Restrict to these sessions
    pub sessions: Vec<String>,
    /// Restrict to these prompting methods
    pub methods: Vec<String>,
    /// Restrict to this detail level
    pub detail: Option<DetailLevel>,
    /// Restrict to law (`Some(true)`) or non-law (`Some(false)`) questions
    pub law: Option<bool>,
}

impl FilterSpec {
    /// Create a filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given test sets
    pub fn with_tests(mut self, tests: Vec<String>) -> Self {
        self.tests = tests;
        self
    }

    /// Restrict to the given models
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Restrict to the given subjects
    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = subjects;
        self
    }

    /// Restrict to the given years
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    /// Restrict to the given sessions
    pub fn with_sessions(mut self, sessions: Vec<String>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Restrict to the given prompting methods
    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    /// Restrict to a detail level
    pub fn with_detail(mut self, detail: Option<DetailLevel>) -> Self {
        self.detail = detail;
        self
    }

    /// Restrict to law or non-law questions
    pub fn with_law(mut self, law: Option<bool>) -> Self {
        self.law = law;
        self
    }

    /// Check whether a record passes all configured restrictions
    pub fn matches(&self, record: &EvaluationRecord) -> bool {
        if !self.tests.is_empty() && !self.tests.iter().any(|t| *t == record.key.test) {
            return false;
        }
        if !self.models.is_empty() && !self.models.iter().any(|m| *m == record.model) {
            return false;
        }
        if !self.subjects.is_empty() {
            match &record.subject {
                Some(subject) => {
                    if !self.subjects.iter().any(|s| s == subject) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if !self.years.is_empty() {
            match record.key.year {
                Some(year) => {
                    if !self.years.contains(&year) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if !self.sessions.is_empty() {
            match &record.key.session {
                Some(session) => {
                    if !self.sessions.iter().any(|s| s == session) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if !self.methods.is_empty() && !self.methods.iter().any(|m| *m == record.method) {
            return false;
        }
        if let Some(detail) = self.detail {
            if record.detail != detail {
                return false;
            }
        }
        if let Some(law) = self.law {
            if record.is_law != Some(law) {
                return false;
            }
        }
        true
    }

    /// Apply this filter to a record slice, preserving order
    pub fn apply<'a>(&self, records: &'a [EvaluationRecord]) -> Vec<&'a EvaluationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
