//! Marking the injection point with `FUZZ`.
//!
//! Query strings are decoded and re-encoded as form data; bodies are edited
//! textually so their original encoding survives.
use lazy_static::lazy_static;
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::form_urlencoded;

pub const FUZZ_MARKER: &str = "FUZZ";

/// Bytes escaped in re-encoded query keys and values. Alphanumerics and
/// `_.-~` stay bare; space is kept here and turned into `+` afterwards.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b' ');

lazy_static! {
    static ref FIRST_BODY_VALUE: Regex = Regex::new(r"=([^&]*)").expect("Could not compile regex");
}

/// Replace a query parameter value in `url` with [`FUZZ_MARKER`].
///
/// With `param`, every pair named `param` is marked; otherwise only the first
/// pair. Everything outside the query is returned untouched, and a URL with no
/// query pairs comes back as is.
pub fn fuzz_query(url: &str, param: Option<&str>) -> String {
    let (without_fragment, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };
    let Some((base, query)) = without_fragment.split_once('?') else {
        return url.to_string();
    };

    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    if pairs.is_empty() {
        return url.to_string();
    }

    match target(param) {
        Some(name) => {
            let mut hits = 0usize;
            for (key, value) in pairs.iter_mut().filter(|(key, _)| key == name) {
                debug!("fuzz event=query_mark key={}", key);
                *value = FUZZ_MARKER.to_string();
                hits += 1;
            }
            if hits == 0 {
                debug!("fuzz event=query_miss param={}", name);
            }
        }
        None => pairs[0].1 = FUZZ_MARKER.to_string(),
    }

    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect();
    format!("{base}?{}{fragment}", encoded.join("&"))
}

fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT)
        .to_string()
        .replace(' ', "+")
}

/// Replace a `name=value` body value with [`FUZZ_MARKER`].
///
/// With `param`, every `param=...` run up to the next `&` is marked. The name
/// is matched literally and not anchored to a pair boundary, so `b` also hits
/// `ab=1`. Without `param`, only the first `=value` in the body is marked.
pub fn fuzz_body(body: &str, param: Option<&str>) -> String {
    if body.is_empty() {
        return String::new();
    }
    let fuzzed = match target(param) {
        Some(name) => mark_named_values(body, name),
        None => FIRST_BODY_VALUE.replacen(body, 1, "=FUZZ").into_owned(),
    };
    if fuzzed == body {
        debug!("fuzz event=body_miss param={:?}", param);
    }
    fuzzed
}

// Scans left to right; after a hit the search resumes at the value's end.
fn mark_named_values(body: &str, name: &str) -> String {
    let needle = format!("{name}=");
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(pos) = rest.find(&needle) {
        let value_start = pos + needle.len();
        out.push_str(&rest[..value_start]);
        out.push_str(FUZZ_MARKER);
        let value_end = rest[value_start..]
            .find('&')
            .map_or(rest.len(), |len| value_start + len);
        rest = &rest[value_end..];
    }
    out.push_str(rest);
    out
}

// An empty name means "no parameter chosen".
fn target(param: Option<&str>) -> Option<&str> {
    param.filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_query_pair_by_default() {
        assert_eq!(
            fuzz_query("https://x.test/p?a=1&b=2", None),
            "https://x.test/p?a=FUZZ&b=2"
        );
    }

    #[test]
    fn named_query_pair_every_occurrence() {
        assert_eq!(
            fuzz_query("https://x.test/p?b=0&a=1&b=2", Some("b")),
            "https://x.test/p?b=FUZZ&a=1&b=FUZZ"
        );
    }

    #[test]
    fn missing_query_param_leaves_pairs_alone() {
        assert_eq!(
            fuzz_query("https://x.test/p?a=1&b=2", Some("zz")),
            "https://x.test/p?a=1&b=2"
        );
    }

    #[test]
    fn blank_values_and_bare_keys_survive() {
        assert_eq!(
            fuzz_query("https://x.test/?a=&flag&c=3", Some("c")),
            "https://x.test/?a=&flag=&c=FUZZ"
        );
    }

    #[test]
    fn url_without_query_is_unchanged() {
        assert_eq!(fuzz_query("https://x.test/p", None), "https://x.test/p");
        assert_eq!(fuzz_query("https://x.test/p?", None), "https://x.test/p?");
        assert_eq!(fuzz_query("https://x.test/p?&&", None), "https://x.test/p?&&");
    }

    #[test]
    fn fragment_and_path_are_preserved() {
        assert_eq!(
            fuzz_query("https://X.test:8443/a%20b;p?q=1#top", None),
            "https://X.test:8443/a%20b;p?q=FUZZ#top"
        );
        // A `?` after `#` belongs to the fragment.
        assert_eq!(fuzz_query("https://x.test/#a?b=1", None), "https://x.test/#a?b=1");
    }

    #[test]
    fn query_is_reencoded_as_form_data() {
        assert_eq!(
            fuzz_query("https://x.test/?q=a%20b+c&id=7", Some("id")),
            "https://x.test/?q=a+b+c&id=FUZZ"
        );
    }

    #[test]
    fn query_encoding_keeps_unreserved_marks() {
        assert_eq!(
            fuzz_query("https://x.test/p?a=1&path=~user/*x", None),
            "https://x.test/p?a=FUZZ&path=~user%2F%2Ax"
        );
        assert_eq!(
            fuzz_query("https://x.test/p?id=1&q=a%20b+c&op=1%2B1&k_.-=v", Some("id")),
            "https://x.test/p?id=FUZZ&q=a+b+c&op=1%2B1&k_.-=v"
        );
        assert_eq!(
            fuzz_query("https://x.test/p?name=J%C3%BCrgen&x=1", Some("x")),
            "https://x.test/p?name=J%C3%BCrgen&x=FUZZ"
        );
    }

    #[test]
    fn empty_param_means_first() {
        assert_eq!(
            fuzz_query("https://x.test/?a=1&b=2", Some("")),
            "https://x.test/?a=FUZZ&b=2"
        );
        assert_eq!(fuzz_body("a=1&b=2", Some("")), "a=FUZZ&b=2");
    }

    #[test]
    fn first_body_value_by_default() {
        assert_eq!(
            fuzz_body("user=bob&pass=hunter2", None),
            "user=FUZZ&pass=hunter2"
        );
    }

    #[test]
    fn named_body_value_every_occurrence() {
        assert_eq!(fuzz_body("a=1&b=2&b=3", Some("b")), "a=1&b=FUZZ&b=FUZZ");
    }

    #[test]
    fn body_name_is_literal() {
        assert_eq!(
            fuzz_body("a.b=1&axb=2", Some("a.b")),
            "a.b=FUZZ&axb=2"
        );
        assert_eq!(
            fuzz_body("items[0]=x&items[1]=y", Some("items[1]")),
            "items[0]=x&items[1]=FUZZ"
        );
    }

    #[test]
    fn body_name_is_not_anchored() {
        assert_eq!(fuzz_body("ab=1&b=2", Some("b")), "ab=FUZZ&b=FUZZ");
    }

    #[test]
    fn overlapping_body_names_resume_after_value() {
        assert_eq!(fuzz_body("b=b=1&b=2", Some("b")), "b=FUZZ&b=FUZZ");
        assert_eq!(fuzz_body("x=1&b=", Some("b")), "x=1&b=FUZZ");
        let long_name = "n".repeat(100_000);
        let body = format!("{long_name}=1&a=2");
        assert_eq!(
            fuzz_body(&body, Some(&long_name)),
            format!("{long_name}=FUZZ&a=2")
        );
    }

    #[test]
    fn body_without_pairs() {
        assert_eq!(fuzz_body("", None), "");
        assert_eq!(fuzz_body("{\"a\":1}", None), "{\"a\":1}");
        assert_eq!(fuzz_body("a=1", Some("zz")), "a=1");
    }

    #[test]
    fn default_body_value_runs_to_next_ampersand() {
        assert_eq!(fuzz_body("x&a=1=2&b=3", None), "x&a=FUZZ&b=3");
    }
}
