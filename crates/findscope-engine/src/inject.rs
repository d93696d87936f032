//! Mandatory parameter injection (bounded, deterministic).
//!
//! Every analyzed request must ask the Find API for its debug payload (`findDebug`) and for the
//! display fields (`fl`). Scheme-less input is parsed relative to a placeholder origin that is
//! stripped again before returning.

use crate::config::InjectConfig;
use crate::query::{get_pair, query_pairs, set_pair, write_query};
use findscope_core::{Error, Result};
use url::Url;

/// Never-routable origin used only to parse scheme-less input.
pub const PLACEHOLDER_ORIGIN: &str = "http://placeholder.invalid/";

/// Inject `findDebug` and `fl` using the built-in contract values.
pub fn inject_mandatory_parameters(raw_url: &str) -> Result<String> {
    inject_with(raw_url, &InjectConfig::default())
}

pub fn inject_with(raw_url: &str, cfg: &InjectConfig) -> Result<String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyUrl);
    }

    let mut s = trimmed.to_string();
    if !s.contains('?') {
        s.push('?');
    }
    let relative = !s.starts_with("http");
    let full = if relative {
        format!("{PLACEHOLDER_ORIGIN}{s}")
    } else {
        s
    };

    let mut u = Url::parse(&full).map_err(|e| Error::MalformedUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    let mut pairs = query_pairs(&u);
    set_pair(&mut pairs, "findDebug", &cfg.find_debug);
    let fl = match get_pair(&pairs, "fl") {
        Some(current) => merge_field_list(current, &cfg.required_fields),
        None => cfg.required_fields.join(","),
    };
    set_pair(&mut pairs, "fl", &fl);
    write_query(&mut u, &pairs);

    let out = u.to_string();
    let out = if relative {
        match out.strip_prefix(PLACEHOLDER_ORIGIN) {
            Some(rest) => rest.to_string(),
            None => {
                return Err(Error::MalformedUrl {
                    url: trimmed.to_string(),
                    reason: "resolved outside the placeholder origin".to_string(),
                })
            }
        }
    } else {
        out
    };

    tracing::debug!(url = %out, "injected mandatory parameters");
    Ok(out)
}

/// Append each required entry to a comma-separated list unless it is already present.
///
/// Existing entries (including duplicates of other values) keep their order.
pub fn merge_field_list(current: &str, required: &[String]) -> String {
    let mut fields: Vec<&str> = current.split(',').collect();
    for r in required {
        if !fields.contains(&r.as_str()) {
            fields.push(r.as_str());
        }
    }
    fields.join(",")
}
