//! Percent-decoding and encoding for hand-split query strings.
//!
//! Decoding is strict in what it accepts (well-formed `%XX` escapes, valid UTF-8) and
//! never fails: anything it cannot decode comes back as the raw text.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn escapes_well_formed(raw: &str) -> bool {
    let b = raw.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        if b[i] == b'%' {
            if i + 2 >= b.len() || !b[i + 1].is_ascii_hexdigit() || !b[i + 2].is_ascii_hexdigit() {
                return false;
            }
            i += 3;
            continue;
        }
        i += 1;
    }
    true
}

/// Decode one query component. `+` is kept literally.
pub fn decode_component(raw: &str) -> String {
    if !escapes_well_formed(raw) {
        return raw.to_string();
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(s) => s.into_owned(),
        Err(_) => raw.to_string(),
    }
}

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Split `k=v` on the first `=`; a missing side is empty.
pub fn split_pair(piece: &str) -> (String, String) {
    let (k, v) = piece.split_once('=').unwrap_or((piece, ""));
    (decode_component(k), decode_component(v))
}
