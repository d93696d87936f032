//! Query-pair helpers shared by the injection and reconciliation engines.
//!
//! Pairs are kept as an ordered `Vec` so re-serialization preserves working order; `set_pair`
//! follows URLSearchParams `set`: first occurrence updated in place, later ones dropped.

use url::Url;

pub(crate) fn host_with_port(u: &Url) -> String {
    let host = u.host_str().unwrap_or_default();
    if let Some(port) = u.port() {
        format!("{host}:{port}")
    } else {
        host.to_string()
    }
}

pub(crate) fn query_pairs(u: &Url) -> Vec<(String, String)> {
    u.query_pairs().into_owned().collect()
}

pub(crate) fn get_pair<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find_map(|(k, v)| (k == key).then_some(v.as_str()))
}

pub(crate) fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut found = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if found {
            return false;
        }
        found = true;
        *v = value.to_string();
        true
    });
    if !found {
        pairs.push((key.to_string(), value.to_string()));
    }
}

/// Replace the query of `u` with `pairs`; an empty list removes the `?` entirely.
pub(crate) fn write_query(u: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        u.set_query(None);
        return;
    }
    u.query_pairs_mut().clear().extend_pairs(pairs);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(xs: &[(&str, &str)]) -> Vec<(String, String)> {
        xs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn set_pair_updates_first_and_drops_duplicates() {
        let mut p = pairs(&[("a", "1"), ("b", "2"), ("a", "3")]);
        set_pair(&mut p, "a", "9");
        assert_eq!(p, pairs(&[("a", "9"), ("b", "2")]));

        set_pair(&mut p, "c", "x");
        assert_eq!(p, pairs(&[("a", "9"), ("b", "2"), ("c", "x")]));
    }

    #[test]
    fn get_pair_returns_first_occurrence() {
        let p = pairs(&[("fl", "a"), ("fl", "b")]);
        assert_eq!(get_pair(&p, "fl"), Some("a"));
        assert_eq!(get_pair(&p, "rows"), None);
    }

    #[test]
    fn write_query_drops_question_mark_when_empty() {
        let mut u = Url::parse("https://example.com/find?x=1").unwrap();
        write_query(&mut u, &[]);
        assert_eq!(u.as_str(), "https://example.com/find");

        write_query(&mut u, &pairs(&[("q", "dog food"), ("fl", "name,imageId")]));
        assert_eq!(
            u.as_str(),
            "https://example.com/find?q=dog+food&fl=name%2CimageId"
        );
    }

    #[test]
    fn host_with_port_keeps_explicit_port() {
        let u = Url::parse("http://localhost:8080/x").unwrap();
        assert_eq!(host_with_port(&u), "localhost:8080");
        let u = Url::parse("https://example.com:443/x").unwrap();
        // Default ports are normalized away by the parser.
        assert_eq!(host_with_port(&u), "example.com");
    }
}
