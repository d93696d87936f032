//! Backend-agnostic data model for `findscope`.
//!
//! This crate intentionally contains no parsing logic. It holds the records that the
//! engines produce (editable query parameters, debug analysis) and the shared error type.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("empty url")]
    EmptyUrl,
    #[error("malformed url {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },
    #[error("unknown parameter: {0}")]
    UnknownParameter(ParamId),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Literal shown for any debug field that no pattern matched.
pub const UNKNOWN: &str = "Unknown";

/// Opaque per-record identity within one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamId(pub u64);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStatus {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ParameterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ParameterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One editable `key=value` record.
///
/// Empty `original_key`/`original_value` mean the record did not exist before editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub id: ParamId,
    pub key: String,
    pub value: String,
    pub original_key: String,
    pub original_value: String,
}

impl QueryParameter {
    /// A record as it was found in the source URL (originals equal current values).
    pub fn from_source(id: ParamId, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        Self {
            id,
            original_key: key.clone(),
            original_value: value.clone(),
            key,
            value,
        }
    }

    /// A record that did not exist before editing.
    pub fn blank(id: ParamId) -> Self {
        Self {
            id,
            key: String::new(),
            value: String::new(),
            original_key: String::new(),
            original_value: String::new(),
        }
    }

    pub fn status(&self) -> ParameterStatus {
        parameter_status(self)
    }
}

/// Derive the edit status purely from the current and original key/value.
pub fn parameter_status(p: &QueryParameter) -> ParameterStatus {
    if p.original_key.is_empty() && !p.key.is_empty() {
        return ParameterStatus::Added;
    }
    if !p.original_key.is_empty() && p.key.is_empty() {
        return ParameterStatus::Removed;
    }
    if p.key != p.original_key || p.value != p.original_value {
        return ParameterStatus::Modified;
    }
    ParameterStatus::Unchanged
}

/// Which decomposition path produced a [`ParsedUrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Parsed as a structured URL (scheme placeholder applied when missing).
    #[default]
    Strict,
    /// Split by hand on `?`, `&` and `=`.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParsedUrl {
    pub base_url: String,
    pub parameters: Vec<QueryParameter>,
    pub mode: ParseMode,
}

impl ParsedUrl {
    /// Current `(key, value)` pairs in working order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }
}

/// Structured fields pulled out of the `hybridSearch` debug sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugAnalysis {
    pub hybrid_search_flow: String,
    pub vector_algorithm: String,
    pub min_return_value: String,
    pub top_results: Option<String>,
    pub similarity_threshold: Option<String>,
}

impl Default for DebugAnalysis {
    fn default() -> Self {
        Self {
            hybrid_search_flow: UNKNOWN.to_string(),
            vector_algorithm: UNKNOWN.to_string(),
            min_return_value: UNKNOWN.to_string(),
            top_results: None,
            similarity_threshold: None,
        }
    }
}

impl DebugAnalysis {
    /// One-line vector search configuration, e.g.
    /// `Top 500 results with similarity above 0.72 using RR_KNN_SIMILARITY`.
    ///
    /// Only available when the current message format reported a result count or threshold.
    pub fn vector_search_summary(&self) -> Option<String> {
        if self.top_results.is_none() && self.similarity_threshold.is_none() {
            return None;
        }
        let mut out = String::new();
        if let Some(n) = &self.top_results {
            out.push_str(&format!(" Top {n} results"));
        }
        if let Some(t) = &self.similarity_threshold {
            out.push_str(&format!(" with similarity above {t}"));
        }
        if self.vector_algorithm != UNKNOWN {
            out.push_str(&format!(" using {}", self.vector_algorithm));
        }
        Some(out.trim().to_string())
    }
}

/// Display-only row of a split request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub key: String,
    pub value: String,
}

impl RequestParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The `searchServiceDebug` object of a Find API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchServiceDebug {
    #[serde(default)]
    pub hybrid_search: Vec<String>,
    #[serde(default)]
    pub search_request: String,
}

/// Everything a caller renders for one response's debug section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub analysis: DebugAnalysis,
    pub summary: Option<String>,
    pub request_params: Vec<RequestParam>,
    pub hybrid_search: Vec<String>,
}
