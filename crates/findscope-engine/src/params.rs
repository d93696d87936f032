//! Editable parameter sets: decompose a URL into records, track edits, recompose.
//!
//! Scheme-less input is parsed as `https://<input>` (its first segment becomes the host) and
//! the scheme is stripped again on `compose`. Input the URL parser rejects falls back to a
//! hand split on `?`, `&` and `=` that never fails.

use crate::decode::{encode_component, split_pair};
use crate::query::{host_with_port, query_pairs, set_pair, write_query};
use findscope_core::{
    Error, ParamField, ParamId, ParseMode, ParsedUrl, QueryParameter, Result,
};
use url::Url;

const SCHEME_PLACEHOLDER: &str = "https://";

#[derive(Debug, Default)]
struct IdGen {
    next: u64,
}

impl IdGen {
    fn next(&mut self) -> ParamId {
        let id = ParamId(self.next);
        self.next += 1;
        id
    }
}

fn with_scheme(s: &str) -> String {
    if s.starts_with("http") {
        s.to_string()
    } else {
        format!("{SCHEME_PLACEHOLDER}{s}")
    }
}

fn strip_scheme(s: &str) -> &str {
    s.strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s)
}

fn parse_strict(raw: &str, ids: &mut IdGen) -> Option<ParsedUrl> {
    let u = Url::parse(&with_scheme(raw)).ok()?;
    let base_url = format!("{}://{}{}", u.scheme(), host_with_port(&u), u.path());
    let parameters = query_pairs(&u)
        .into_iter()
        .map(|(k, v)| QueryParameter::from_source(ids.next(), k, v))
        .collect();
    Some(ParsedUrl {
        base_url,
        parameters,
        mode: ParseMode::Strict,
    })
}

fn parse_lenient(raw: &str, ids: &mut IdGen) -> ParsedUrl {
    let (base, query) = match raw.split_once('?') {
        Some((b, q)) => (b, q),
        None => (raw, ""),
    };
    let parameters = if query.is_empty() {
        Vec::new()
    } else {
        query
            .split('&')
            .map(|piece| {
                let (k, v) = split_pair(piece);
                QueryParameter::from_source(ids.next(), k, v)
            })
            .collect()
    };
    ParsedUrl {
        base_url: base.to_string(),
        parameters,
        mode: ParseMode::Lenient,
    }
}

fn parse_with(raw_url: &str, ids: &mut IdGen) -> ParsedUrl {
    let raw = raw_url.trim();
    if raw.is_empty() {
        return ParsedUrl::default();
    }
    match parse_strict(raw, ids) {
        Some(p) => p,
        None => {
            tracing::debug!(url = raw, "url parser rejected input; splitting by hand");
            parse_lenient(raw, ids)
        }
    }
}

/// Decompose `raw_url` into a base URL and editable records. Never fails.
pub fn parse(raw_url: &str) -> ParsedUrl {
    parse_with(raw_url, &mut IdGen::default())
}

/// One editing session over the parameters of a source URL.
#[derive(Debug)]
pub struct ParameterSet {
    source_url: String,
    parsed: ParsedUrl,
    dirty: bool,
    ids: IdGen,
}

impl ParameterSet {
    pub fn open(raw_url: &str) -> Self {
        let mut ids = IdGen::default();
        let parsed = parse_with(raw_url, &mut ids);
        Self {
            source_url: raw_url.trim().to_string(),
            parsed,
            dirty: false,
            ids,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn base_url(&self) -> &str {
        &self.parsed.base_url
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parsed.parameters
    }

    pub fn parsed(&self) -> &ParsedUrl {
        &self.parsed
    }

    pub fn mode(&self) -> ParseMode {
        self.parsed.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, id: ParamId) -> Option<&QueryParameter> {
        self.parsed.parameters.iter().find(|p| p.id == id)
    }

    /// First record whose current key is `key`.
    pub fn find_key(&self, key: &str) -> Option<ParamId> {
        self.parsed
            .parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.id)
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.parsed.base_url = base_url.into();
        self.dirty = true;
    }

    /// Overwrite the key or value of one record; originals are left as they were.
    pub fn update_parameter(
        &mut self,
        id: ParamId,
        field: ParamField,
        new_value: impl Into<String>,
    ) -> Result<()> {
        let p = self
            .parsed
            .parameters
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::UnknownParameter(id))?;
        match field {
            ParamField::Key => p.key = new_value.into(),
            ParamField::Value => p.value = new_value.into(),
        }
        self.dirty = true;
        Ok(())
    }

    pub fn add_parameter(&mut self) -> ParamId {
        let id = self.ids.next();
        self.parsed.parameters.push(QueryParameter::blank(id));
        self.dirty = true;
        id
    }

    /// Delete a record outright. No `removed` tombstone is kept.
    pub fn remove_parameter(&mut self, id: ParamId) -> Result<QueryParameter> {
        let idx = self
            .parsed
            .parameters
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::UnknownParameter(id))?;
        self.dirty = true;
        Ok(self.parsed.parameters.remove(idx))
    }

    /// Discard every edit by re-parsing the source URL.
    pub fn reset(&mut self) {
        self.parsed = parse_with(&self.source_url, &mut self.ids);
        self.dirty = false;
    }

    /// Display-only rendering of the working set: `base_url`, then every record with a
    /// non-blank key in order, `encodeURIComponent`-encoded. Duplicates are not collapsed, so
    /// this can differ from [`ParameterSet::compose`].
    pub fn preview(&self) -> String {
        append_encoded(
            &self.parsed.base_url,
            self.parsed
                .parameters
                .iter()
                .filter(|p| !p.key.trim().is_empty())
                .map(|p| (p.key.as_str(), p.value.as_str())),
        )
    }

    /// Recompose the working set into a URL string.
    ///
    /// Records with a blank key are omitted; a repeated key keeps its first position and its
    /// last value. Records are set on top of whatever query and fragment `base_url` carries.
    pub fn compose(&self) -> Result<String> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for p in &self.parsed.parameters {
            let key = p.key.trim();
            if key.is_empty() {
                continue;
            }
            set_pair(&mut pairs, key, &p.value);
        }

        let base = self.parsed.base_url.trim();
        let out = match Url::parse(&with_scheme(base)) {
            Ok(mut u) => {
                // Pairs already on the base survive unless a record sets the same key.
                let mut merged = query_pairs(&u);
                for (k, v) in &pairs {
                    set_pair(&mut merged, k, v);
                }
                write_query(&mut u, &merged);
                let s = u.to_string();
                if self.source_url.starts_with("http") {
                    s
                } else {
                    strip_scheme(&s).to_string()
                }
            }
            Err(e) if self.parsed.mode == ParseMode::Lenient => {
                tracing::debug!(base, error = %e, "composing lenient parameter set by hand");
                compose_lenient(base, &pairs)
            }
            Err(e) => {
                return Err(Error::MalformedUrl {
                    url: base.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        tracing::debug!(url = %out, "composed parameter set");
        Ok(out)
    }
}

fn compose_lenient(base: &str, pairs: &[(String, String)]) -> String {
    append_encoded(base, pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

fn append_encoded<'a>(base: &str, pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let query: Vec<String> = pairs
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect();
    if query.is_empty() {
        return base.to_string();
    }
    format!("{base}?{}", query.join("&"))
}
