//! Expected API calls for Side-effect ground truth.

use regex::Regex;
use serde_json::Value;

use super::definition::ExpectedCallDefinition;
use super::operator::{Expectation, ANY_TOKEN};
use crate::error::{EvalError, Result};
use crate::query::{parse_query, split_path, QueryMap};

/// A ground-truth path, classified once at load time.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Contains `[[ANY]]`; matched by unanchored regex search.
    Wildcard {
        /// The path as written in ground truth.
        pattern: String,
        /// Compiled form with literal segments escaped.
        regex: Regex,
    },
    /// Declares a query string; matched by prefix plus query-value sets.
    WithQuery {
        /// The path as written in ground truth.
        pattern: String,
        /// Path before the `?`.
        base: String,
        /// Parsed expected query parameters.
        query: QueryMap,
    },
    /// A plain path.
    Exact(String),
}

impl PathPattern {
    /// Classifies a ground-truth path.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidPathPattern`] if a wildcard pattern fails to compile.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.contains(ANY_TOKEN) {
            let escaped: Vec<String> = pattern.split(ANY_TOKEN).map(regex::escape).collect();
            let regex = Regex::new(&escaped.join(".*")).map_err(|source| {
                EvalError::InvalidPathPattern { pattern: pattern.to_string(), source }
            })?;
            return Ok(Self::Wildcard { pattern: pattern.to_string(), regex });
        }

        match split_path(pattern) {
            (base, Some(query)) => Ok(Self::WithQuery {
                pattern: pattern.to_string(),
                base: base.to_string(),
                query: parse_query(query),
            }),
            (_, None) => Ok(Self::Exact(pattern.to_string())),
        }
    }

    /// The path as written in ground truth.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wildcard { pattern, .. } | Self::WithQuery { pattern, .. } => pattern,
            Self::Exact(path) => path,
        }
    }
}

/// One API call the agent is expected to have caused.
#[derive(Debug, Clone)]
pub struct ExpectedCall {
    /// HTTP method, compared exactly.
    pub method: String,
    /// Path pattern.
    pub path: PathPattern,
    /// Request-body constraints in ground-truth order. Metadata keys are excluded.
    pub request_kv: Vec<(String, Expectation)>,
}

impl ExpectedCall {
    /// Builds an expected call from its ground-truth definition.
    ///
    /// Keys starting with `_` are metadata and are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the path pattern or an operator token is invalid.
    pub fn from_definition(def: &ExpectedCallDefinition) -> Result<Self> {
        let mut request_kv = Vec::new();
        if let Some(kv) = &def.request_kv {
            for (key, value) in kv {
                if key.starts_with('_') {
                    continue;
                }
                request_kv.push((key.clone(), Expectation::parse(value)?));
            }
        }
        Ok(Self { method: def.method.clone(), path: PathPattern::parse(&def.path)?, request_kv })
    }

    /// Short `METHOD path` label used in reports.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path.as_str())
    }
}

/// An independent, complete set of expected calls.
#[derive(Debug, Clone)]
pub struct AnswerOption {
    /// The grouping tag from ground truth.
    pub answer_id: String,
    /// Calls that must all be observed.
    pub calls: Vec<ExpectedCall>,
}

/// Side-effect ground truth.
#[derive(Debug, Clone)]
pub enum SideEffectAnswer {
    /// A single group: every call must be observed.
    Calls(Vec<ExpectedCall>),
    /// Alternative groups: any one group observed in full is sufficient.
    Options(Vec<AnswerOption>),
}

impl SideEffectAnswer {
    /// Resolves a list of call definitions into ground truth.
    ///
    /// When any entry carries an `answer_id`, entries are grouped by it in
    /// order of first appearance, and untagged entries are shared by every group.
    ///
    /// # Errors
    ///
    /// Returns an error if any call definition is invalid.
    pub fn from_definitions(defs: &[ExpectedCallDefinition]) -> Result<Self> {
        let mut shared = Vec::new();
        let mut options: Vec<AnswerOption> = Vec::new();

        for def in defs {
            let call = ExpectedCall::from_definition(def)?;
            match def.answer_id.as_ref().map(answer_id_string) {
                None => shared.push(call),
                Some(id) => match options.iter_mut().find(|o| o.answer_id == id) {
                    Some(option) => option.calls.push(call),
                    None => options.push(AnswerOption { answer_id: id, calls: vec![call] }),
                },
            }
        }

        if options.is_empty() {
            return Ok(Self::Calls(shared));
        }
        for option in &mut options {
            let mut calls = shared.clone();
            calls.append(&mut option.calls);
            option.calls = calls;
        }
        Ok(Self::Options(options))
    }

    /// Total number of distinct expected calls across all groups.
    #[must_use]
    pub fn call_count(&self) -> usize {
        match self {
            Self::Calls(calls) => calls.len(),
            Self::Options(options) => options.iter().map(|o| o.calls.len()).sum(),
        }
    }
}

fn answer_id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
