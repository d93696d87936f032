//! Display rows for the raw `searchRequest` URL reported in the debug payload.

use crate::decode::split_pair;
use findscope_core::RequestParam;

pub const BASE_URL_KEY: &str = "Base URL";
pub const URL_KEY: &str = "URL";

/// Split a request URL into a base row followed by one row per query piece.
///
/// Never fails: undecodable pieces are shown raw.
pub fn split_request_url(url: &str) -> Vec<RequestParam> {
    if url.is_empty() {
        return Vec::new();
    }
    let (base, query) = match url.split_once('?') {
        Some((b, q)) if !q.is_empty() => (b, q),
        Some((b, _)) => return vec![RequestParam::new(URL_KEY, b)],
        None => return vec![RequestParam::new(URL_KEY, url)],
    };

    let mut out = vec![RequestParam::new(BASE_URL_KEY, base)];
    out.extend(query.split('&').map(|piece| {
        let (k, v) = split_pair(piece);
        RequestParam::new(k, v)
    }));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(v: &[RequestParam]) -> Vec<(&str, &str)> {
        v.iter().map(|r| (r.key.as_str(), r.value.as_str())).collect()
    }

    #[test]
    fn splits_base_and_decodes_pairs() {
        let out = split_request_url("host/path?a=1&b=two%20words");
        assert_eq!(
            rows(&out),
            vec![("Base URL", "host/path"), ("a", "1"), ("b", "two words")]
        );
    }

    #[test]
    fn no_query_yields_single_url_row() {
        assert_eq!(
            rows(&split_request_url("http://solr:8983/select")),
            vec![("URL", "http://solr:8983/select")]
        );
        assert_eq!(
            rows(&split_request_url("http://solr:8983/select?")),
            vec![("URL", "http://solr:8983/select")]
        );
        assert!(split_request_url("").is_empty());
    }

    #[test]
    fn keeps_order_duplicates_and_raw_text() {
        let out = split_request_url("/select?fq=a&fq=b&q=%E0%A4%A&flag&bq=x=y");
        assert_eq!(
            rows(&out),
            vec![
                ("Base URL", "/select"),
                ("fq", "a"),
                ("fq", "b"),
                ("q", "%E0%A4%A"),
                ("flag", ""),
                ("bq", "x=y"),
            ]
        );
    }
}
