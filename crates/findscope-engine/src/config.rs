//! Environment-driven knobs (`FINDSCOPE_*`).
//!
//! Every config struct has a `Default` holding the Find API contract values; `from_env`
//! only overrides fields whose variable is set and non-empty.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FIND_DEBUG: &str = "searchServiceDebug,solrDebugAll";
pub const DEFAULT_REQUIRED_FIELDS: [&str; 2] = ["name", "imageId"];
pub const DEFAULT_VECTOR_ALGORITHMS: [&str; 4] = [
    "RR_VECTOR_SIMILARITY",
    "RR_KNN_SIMILARITY",
    "VECTOR_SIMILARITY",
    "KNN_SIMILARITY",
];

pub(crate) fn env_csv(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Mandatory parameters injected into every analyzed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectConfig {
    /// Value forced onto `findDebug` (overrides whatever the caller sent).
    pub find_debug: String,
    /// Entries that must be present in `fl`, appended in this order when missing.
    pub required_fields: Vec<String>,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            find_debug: DEFAULT_FIND_DEBUG.to_string(),
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl InjectConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_string("FINDSCOPE_FIND_DEBUG") {
            cfg.find_debug = v;
        }
        let fields = env_csv("FINDSCOPE_REQUIRED_FIELDS");
        if !fields.is_empty() {
            cfg.required_fields = fields;
        }
        cfg
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Algorithm identifiers for the name fallback, highest priority first.
    pub known_algorithms: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            known_algorithms: DEFAULT_VECTOR_ALGORITHMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Self {
        let algos = env_csv("FINDSCOPE_VECTOR_ALGORITHMS");
        if algos.is_empty() {
            Self::default()
        } else {
            Self {
                known_algorithms: algos,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that mutate them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn inject_config_reads_overrides_and_ignores_blank_values() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("FINDSCOPE_FIND_DEBUG", "  searchServiceDebug ");
        std::env::set_var("FINDSCOPE_REQUIRED_FIELDS", "name, price ,,");
        let cfg = InjectConfig::from_env();
        assert_eq!(cfg.find_debug, "searchServiceDebug");
        assert_eq!(cfg.required_fields, vec!["name", "price"]);

        std::env::set_var("FINDSCOPE_FIND_DEBUG", "   ");
        std::env::set_var("FINDSCOPE_REQUIRED_FIELDS", " , ");
        assert_eq!(InjectConfig::from_env(), InjectConfig::default());

        std::env::remove_var("FINDSCOPE_FIND_DEBUG");
        std::env::remove_var("FINDSCOPE_REQUIRED_FIELDS");
        assert_eq!(InjectConfig::from_env(), InjectConfig::default());
    }

    #[test]
    fn analyzer_config_reads_algorithm_list() {
        let _g = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("FINDSCOPE_VECTOR_ALGORITHMS", "HNSW_SIMILARITY,KNN_SIMILARITY");
        assert_eq!(
            AnalyzerConfig::from_env().known_algorithms,
            vec!["HNSW_SIMILARITY", "KNN_SIMILARITY"]
        );
        std::env::remove_var("FINDSCOPE_VECTOR_ALGORITHMS");
        assert_eq!(AnalyzerConfig::from_env(), AnalyzerConfig::default());
    }
}
