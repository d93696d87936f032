//! Structured fields from the free-form `hybridSearch` debug sentences.
//!
//! The sentence format changed between API versions, so extraction is an ordered chain of
//! passes. Each pass only fills fields that are still unset; nothing found earlier is
//! overwritten.
//!
//! Legacy: `Vector search based on the algo RR_VECTOR_SIMILARITY with minReturn as 0.72 for Main flow`
//! Current: `Top 500 results with similarity above 0.72 will be picked from RR_KNN_SIMILARITY Vector search based on the configuration for Main flow`

use crate::config::AnalyzerConfig;
use findscope_core::{DebugAnalysis, UNKNOWN};
use regex::Regex;
use std::sync::OnceLock;

const FLOW_MARKER: &str = "Hybrid search is executed for";
const LEGACY_MARKERS: [&str; 2] = ["Vector search based on the algo", "with minReturn as"];
const CURRENT_MARKERS: [&str; 2] = ["results with similarity above", "will be picked from"];

struct Patterns {
    legacy_algo: Regex,
    legacy_min_return: Regex,
    top_results: Regex,
    similarity: Regex,
    current_algo: Regex,
    number: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        legacy_algo: Regex::new(r"algo\s+([A-Za-z0-9_]+)").expect("static regex"),
        legacy_min_return: Regex::new(r"minReturn as\s+([0-9.]+)").expect("static regex"),
        top_results: Regex::new(r"Top\s+([0-9]+)\s+results").expect("static regex"),
        similarity: Regex::new(r"similarity above\s+([0-9.]+)").expect("static regex"),
        current_algo: Regex::new(r"from\s+([A-Za-z0-9_]+)\s+Vector search").expect("static regex"),
        number: Regex::new(r"[0-9.]+").expect("static regex"),
    })
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_unset(field: &str) -> bool {
    field == UNKNOWN
}

fn fill(slot: &mut String, value: Option<String>) {
    if is_unset(slot) {
        if let Some(v) = value {
            *slot = v;
        }
    }
}

/// Numeric prefix of a `[0-9.]+` token, the way a lenient float parser reads it
/// (`0.72.` reads as `0.72`, `.` reads as nothing).
fn leading_float(token: &str) -> Option<f64> {
    let end = token
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    token[..end].parse::<f64>().ok()
}

#[derive(Debug, Clone, Default)]
pub struct DebugTextAnalyzer {
    config: AnalyzerConfig,
}

impl DebugTextAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze<S: AsRef<str>>(&self, lines: &[S]) -> DebugAnalysis {
        let mut a = DebugAnalysis::default();
        if lines.is_empty() {
            return a;
        }
        let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        let p = patterns();

        // 1. flow label
        if let Some(line) = lines.iter().find(|l| l.contains(FLOW_MARKER)) {
            if let Some((_, rest)) = line.split_once(" for ") {
                a.hybrid_search_flow = rest.to_string();
            }
        }

        // 2. legacy format
        if let Some(line) = lines
            .iter()
            .find(|l| LEGACY_MARKERS.iter().all(|m| l.contains(m)))
        {
            fill(&mut a.vector_algorithm, capture(&p.legacy_algo, line));
            fill(&mut a.min_return_value, capture(&p.legacy_min_return, line));
        }

        // 3. current format
        if let Some(line) = lines
            .iter()
            .find(|l| CURRENT_MARKERS.iter().all(|m| l.contains(m)))
        {
            if let Some(top) = capture(&p.top_results, line) {
                a.top_results = Some(top);
            }
            if let Some(threshold) = capture(&p.similarity, line) {
                fill(&mut a.min_return_value, Some(threshold.clone()));
                a.similarity_threshold = Some(threshold);
            }
            fill(&mut a.vector_algorithm, capture(&p.current_algo, line));
        }

        // 4. any known algorithm identifier
        if is_unset(&a.vector_algorithm) {
            let found = lines.iter().find_map(|line| {
                self.config
                    .known_algorithms
                    .iter()
                    .find(|algo| line.contains(algo.as_str()))
                    .cloned()
            });
            fill(&mut a.vector_algorithm, found);
        }

        // 5. any decimal that looks like a similarity score
        if is_unset(&a.min_return_value) {
            let found = lines.iter().find_map(|line| {
                p.number
                    .find_iter(line)
                    .map(|m| m.as_str())
                    .find(|tok| {
                        tok.contains('.')
                            && leading_float(tok).is_some_and(|n| (0.0..=1.0).contains(&n))
                    })
                    .map(str::to_string)
            });
            fill(&mut a.min_return_value, found);
        }

        a
    }
}

/// Analyze with the built-in algorithm list.
pub fn analyze<S: AsRef<str>>(lines: &[S]) -> DebugAnalysis {
    DebugTextAnalyzer::default().analyze(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str =
        "Vector search based on the algo RR_VECTOR_SIMILARITY with minReturn as 0.72 for Main flow";
    const CURRENT: &str = "Top 500 results with similarity above 0.72 will be picked from RR_KNN_SIMILARITY Vector search based on the configuration for Main flow";

    #[test]
    fn legacy_format() {
        let a = analyze(&["Hybrid search is executed for Main flow", LEGACY]);
        assert_eq!(
            a,
            DebugAnalysis {
                hybrid_search_flow: "Main flow".to_string(),
                vector_algorithm: "RR_VECTOR_SIMILARITY".to_string(),
                min_return_value: "0.72".to_string(),
                top_results: None,
                similarity_threshold: None,
            }
        );
    }

    #[test]
    fn current_format() {
        let a = analyze(&[CURRENT]);
        assert_eq!(a.top_results.as_deref(), Some("500"));
        assert_eq!(a.similarity_threshold.as_deref(), Some("0.72"));
        assert_eq!(a.min_return_value, "0.72");
        assert_eq!(a.vector_algorithm, "RR_KNN_SIMILARITY");
        assert_eq!(a.hybrid_search_flow, UNKNOWN);
    }

    #[test]
    fn empty_input_yields_defaults() {
        let none: [&str; 0] = [];
        assert_eq!(analyze(&none), DebugAnalysis::default());
        assert_eq!(analyze(&["nothing to see"]), DebugAnalysis::default());
    }

    #[test]
    fn legacy_values_win_over_current_ones() {
        let current = "Top 10 results with similarity above 0.5 will be picked from KNN_SIMILARITY Vector search based on the configuration";
        let a = analyze(&[current, LEGACY]);
        assert_eq!(a.vector_algorithm, "RR_VECTOR_SIMILARITY");
        assert_eq!(a.min_return_value, "0.72");
        assert_eq!(a.similarity_threshold.as_deref(), Some("0.5"));
        assert_eq!(a.top_results.as_deref(), Some("10"));
    }

    #[test]
    fn flow_takes_everything_after_first_for() {
        let a = analyze(&["Hybrid search is executed for Main flow for category pages"]);
        assert_eq!(a.hybrid_search_flow, "Main flow for category pages");

        let a = analyze(&["Hybrid search is executed for"]);
        assert_eq!(a.hybrid_search_flow, UNKNOWN);
    }

    #[test]
    fn first_matching_line_is_used() {
        let a = analyze(&[
            "Hybrid search is executed for Main flow",
            "Hybrid search is executed for Fallback flow",
        ]);
        assert_eq!(a.hybrid_search_flow, "Main flow");
    }

    #[test]
    fn algorithm_fallback_respects_priority_and_line_order() {
        let a = analyze(&["using RR_VECTOR_SIMILARITY"]);
        assert_eq!(a.vector_algorithm, "RR_VECTOR_SIMILARITY");

        let a = analyze(&["KNN_SIMILARITY first", "then RR_VECTOR_SIMILARITY"]);
        assert_eq!(a.vector_algorithm, "KNN_SIMILARITY");

        let a = analyze(&["mixed KNN_SIMILARITY and VECTOR_SIMILARITY"]);
        assert_eq!(a.vector_algorithm, "VECTOR_SIMILARITY");
    }

    #[test]
    fn threshold_fallback_picks_first_score_like_decimal() {
        let a = analyze(&["took 12 ms", "scores 1.5 then 0.35 then 0.9"]);
        assert_eq!(a.min_return_value, "0.35");

        let a = analyze(&["version 2.0", "cutoff 1.0"]);
        assert_eq!(a.min_return_value, "1.0");

        // Integers never qualify even when in range.
        let a = analyze(&["rows 0 1"]);
        assert_eq!(a.min_return_value, UNKNOWN);
    }

    #[test]
    fn threshold_fallback_reads_token_prefix() {
        let a = analyze(&["threshold 0.72. done"]);
        assert_eq!(a.min_return_value, "0.72.");
        let a = analyze(&["end of sentence. nothing"]);
        assert_eq!(a.min_return_value, UNKNOWN);
    }

    #[test]
    fn custom_algorithm_list() {
        let analyzer = DebugTextAnalyzer::new(AnalyzerConfig {
            known_algorithms: vec!["HNSW_SIMILARITY".to_string()],
        });
        let a = analyzer.analyze(&["using HNSW_SIMILARITY and KNN_SIMILARITY"]);
        assert_eq!(a.vector_algorithm, "HNSW_SIMILARITY");
    }

    #[test]
    fn leading_float_parses_prefix() {
        assert_eq!(leading_float("0.72"), Some(0.72));
        assert_eq!(leading_float("0.72.1"), Some(0.72));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("1."), Some(1.0));
    }
}
