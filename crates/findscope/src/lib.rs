//! Public facade crate for `findscope`.
//!
//! Re-exports the data model from `findscope-core` and the engines from `findscope-engine`.

pub use findscope_core::*;
pub use findscope_engine as engine;
pub use findscope_engine::{
    analyze, build_report, extract_search_service_debug, inject_mandatory_parameters,
    inject_with, parse, split_request_url, AnalyzerConfig, DebugTextAnalyzer, InjectConfig,
    ParameterSet,
};
