//! Find API request preparation and debug analysis.
//!
//! - [`inject`]: force the debug/display parameters onto a request URL.
//! - [`params`]: edit a URL's query parameters one record at a time.
//! - [`debug_text`]: pull structured fields out of `hybridSearch` sentences.
//! - [`request`], [`payload`]: display helpers for the response's debug section.
//!
//! Everything here is pure and synchronous; nothing touches the network.

pub mod config;
pub mod debug_text;
pub mod decode;
pub mod inject;
pub mod params;
pub mod payload;
mod query;
pub mod request;

pub use config::{AnalyzerConfig, InjectConfig};
pub use debug_text::{analyze, DebugTextAnalyzer};
pub use inject::{inject_mandatory_parameters, inject_with};
pub use params::{parse, ParameterSet};
pub use payload::{build_report, extract_search_service_debug, search_service_debug_from_str};
pub use request::split_request_url;
