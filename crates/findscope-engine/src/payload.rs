//! Locating the `searchServiceDebug` section of a Find API response.

use crate::debug_text::DebugTextAnalyzer;
use crate::request::split_request_url;
use findscope_core::{DebugReport, Error, Result, SearchServiceDebug};

/// Read `searchServiceDebug` from a response document.
///
/// Returns `None` when the response carries no debug section (the request was not made with
/// `findDebug`). Non-string `hybridSearch` entries are skipped.
pub fn extract_search_service_debug(response: &serde_json::Value) -> Option<SearchServiceDebug> {
    let dbg = response.get("searchServiceDebug")?;
    if !dbg.is_object() {
        return None;
    }
    let hybrid_search = dbg
        .get("hybridSearch")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|x| x.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let search_request = dbg
        .get("searchRequest")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Some(SearchServiceDebug {
        hybrid_search,
        search_request,
    })
}

/// Parse a response body and extract its debug section.
pub fn search_service_debug_from_str(body: &str) -> Result<Option<SearchServiceDebug>> {
    let v: serde_json::Value =
        serde_json::from_str(body).map_err(|e| Error::InvalidPayload(e.to_string()))?;
    Ok(extract_search_service_debug(&v))
}

pub fn build_report(dbg: &SearchServiceDebug, analyzer: &DebugTextAnalyzer) -> DebugReport {
    let analysis = analyzer.analyze(&dbg.hybrid_search);
    DebugReport {
        summary: analysis.vector_search_summary(),
        analysis,
        request_params: split_request_url(&dbg.search_request),
        hybrid_search: dbg.hybrid_search.clone(),
    }
}
