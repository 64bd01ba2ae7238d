use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::parse::{has_url_scheme, unquote_token};

pub const CURL_PROGRAM: &str = "curl";
pub const DEFAULT_METHOD: &str = "GET";

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"https?://\S+").expect("Could not compile regex");
}

/// HTTP semantics recovered from a curl invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlRequest {
    pub method: String,
    pub url: Option<String>,
    /// Raw `Name: value` lines in command order; a `-b` cookie comes last.
    pub headers: Vec<String>,
    pub body: Option<String>,
}

impl CurlRequest {
    pub fn new() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            url: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|body| !body.is_empty())
    }
}

impl Default for CurlRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ValueFlag {
    Method,
    Header,
    Data,
    Cookie,
}

/// curl flags that take the following token as their value.
const VALUE_FLAGS: &[(&str, ValueFlag)] = &[
    ("-X", ValueFlag::Method),
    ("--request", ValueFlag::Method),
    ("-H", ValueFlag::Header),
    ("--header", ValueFlag::Header),
    ("-d", ValueFlag::Data),
    ("--data", ValueFlag::Data),
    ("--data-raw", ValueFlag::Data),
    ("--data-binary", ValueFlag::Data),
    ("-b", ValueFlag::Cookie),
    ("--cookie", ValueFlag::Cookie),
];

fn value_flag(token: &str) -> Option<ValueFlag> {
    VALUE_FLAGS
        .iter()
        .find(|(spelling, _)| *spelling == token)
        .map(|(_, flag)| *flag)
}

/// Walk the token stream and build a [`CurlRequest`].
///
/// Unknown flags are skipped. A missing URL is left as `None` for the caller
/// to report.
pub fn extract_request(tokens: &[String]) -> CurlRequest {
    let mut request = CurlRequest::new();
    let mut cookie: Option<String> = None;
    let mut idx = 0;

    while idx < tokens.len() {
        let token = tokens[idx].as_str();
        if token == CURL_PROGRAM {
            idx += 1;
            continue;
        }
        if let (Some(flag), Some(value)) = (value_flag(token), tokens.get(idx + 1)) {
            apply_value_flag(&mut request, &mut cookie, flag, value);
            idx += 2;
            continue;
        }
        if has_url_scheme(token) {
            let url = URL_PATTERN
                .find(token)
                .map_or(token, |found| found.as_str());
            if let Some(previous) = &request.url {
                debug!("extract event=url_replaced previous={} next={}", previous, url);
            }
            request.url = Some(url.to_string());
        }
        idx += 1;
    }

    if let Some(cookie) = cookie.filter(|cookie| !cookie.is_empty()) {
        request.headers.push(format!("Cookie: {cookie}"));
    }
    if request.has_body() && request.method == DEFAULT_METHOD {
        request.method = "POST".to_string();
    }

    debug!(
        "extract event=done method={} url={:?} headers={} body={}",
        request.method,
        request.url,
        request.headers.len(),
        request.has_body()
    );
    request
}

fn apply_value_flag(
    request: &mut CurlRequest,
    cookie: &mut Option<String>,
    flag: ValueFlag,
    raw: &str,
) {
    let value = unquote_token(raw);
    match flag {
        ValueFlag::Method => {
            request.method = value.to_uppercase().trim_start_matches('$').to_string();
        }
        ValueFlag::Header => {
            let header = value.strip_prefix('$').unwrap_or(&value);
            request.headers.push(header.to_string());
        }
        ValueFlag::Data => {
            request.body = Some(value);
            if request.method == DEFAULT_METHOD {
                request.method = "POST".to_string();
            }
        }
        ValueFlag::Cookie => {
            let value = value.strip_prefix('$').unwrap_or(&value);
            *cookie = Some(value.to_string());
        }
    }
}
