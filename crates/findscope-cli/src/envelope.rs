use serde::Serialize;

pub(crate) const SCHEMA_VERSION: u64 = 1;

pub(crate) fn warning_hint(code: &'static str) -> Option<&'static str> {
    match code {
        "no_debug_section" => Some(
            "The response has no searchServiceDebug object. Run the request URL through `findscope inject` so findDebug is set, then fetch again.",
        ),
        "no_hybrid_search_lines" => Some(
            "searchServiceDebug.hybridSearch is empty; hybrid (vector) search probably did not run for this query.",
        ),
        "vector_algorithm_unknown" => Some(
            "No known vector algorithm was found in the debug text. If the API reports a new identifier, add it to FINDSCOPE_VECTOR_ALGORITHMS.",
        ),
        "lenient_parse" => Some(
            "The URL parser rejected this input, so parameters were split by hand. Check the host part of the URL for spaces or other invalid characters.",
        ),
        _ => None,
    }
}

pub(crate) fn warning_hints_from(codes: &[&'static str]) -> serde_json::Value {
    let mut m = serde_json::Map::new();
    for c in codes {
        if let Some(h) = warning_hint(c) {
            m.insert((*c).to_string(), serde_json::json!(h));
        }
    }
    serde_json::Value::Object(m)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidParams,
    EmptyUrl,
    MalformedUrl,
    UnknownParameter,
    InvalidPayload,
    UnexpectedError,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::EmptyUrl => "empty_url",
            Self::MalformedUrl => "malformed_url",
            Self::UnknownParameter => "unknown_parameter",
            Self::InvalidPayload => "invalid_payload",
            Self::UnexpectedError => "unexpected_error",
        }
    }

    /// Every operation is a deterministic transform of its input.
    pub(crate) fn retryable(self) -> bool {
        false
    }

    pub(crate) fn hint(self) -> &'static str {
        match self {
            Self::InvalidParams => "Check the command arguments (see --help).",
            Self::EmptyUrl => "Pass a non-empty Find API URL.",
            Self::MalformedUrl => {
                "The URL could not be parsed. Check the scheme and host (no spaces, no empty host)."
            }
            Self::UnknownParameter => "The parameter does not exist in this URL.",
            Self::InvalidPayload => "The response body is not valid JSON.",
            Self::UnexpectedError => "Unexpected failure; rerun with FINDSCOPE_LOG=debug.",
        }
    }
}

impl From<&findscope_core::Error> for ErrorCode {
    fn from(e: &findscope_core::Error) -> Self {
        match e {
            findscope_core::Error::EmptyUrl => Self::EmptyUrl,
            findscope_core::Error::MalformedUrl { .. } => Self::MalformedUrl,
            findscope_core::Error::UnknownParameter(_) => Self::UnknownParameter,
            findscope_core::Error::InvalidPayload(_) => Self::InvalidPayload,
        }
    }
}

pub(crate) fn add_envelope_fields(payload: &mut serde_json::Value, kind: &str, elapsed_ms: u128) {
    payload["schema_version"] = serde_json::json!(SCHEMA_VERSION);
    payload["kind"] = serde_json::json!(kind);
    payload["elapsed_ms"] = serde_json::json!(elapsed_ms);
    if payload.get("warnings").is_none() {
        payload["warnings"] = serde_json::json!([]);
    }
}

pub(crate) fn error_obj(code: ErrorCode, message: impl ToString) -> serde_json::Value {
    #[derive(Serialize)]
    struct ErrorObject {
        code: &'static str,
        message: String,
        hint: &'static str,
        retryable: bool,
    }

    let e = ErrorObject {
        code: code.as_str(),
        message: message.to_string(),
        hint: code.hint(),
        retryable: code.retryable(),
    };
    match serde_json::to_value(e) {
        Ok(v) => v,
        Err(_) => serde_json::json!({
            "code": code.as_str(),
            "message": message.to_string(),
            "hint": code.hint(),
            "retryable": code.retryable()
        }),
    }
}

pub(crate) fn error_payload(code: ErrorCode, message: impl ToString) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error": error_obj(code, message),
    })
}
