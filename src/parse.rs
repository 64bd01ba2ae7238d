//! Turning a captured curl command into a structured request.
//!
//! - `tokenizer` splits the raw line into shell words.
//! - `unquote_token` strips the quoting leftovers that request exporters
//!   leave behind (`$'...'`, stray `$Host:` prefixes).
//! - `request_parser` walks the words and collects method, URL, headers,
//!   cookie and body.

mod request_parser;
mod tokenizer;

pub use request_parser::{extract_request, CurlRequest, CURL_PROGRAM, DEFAULT_METHOD};
pub use tokenizer::parse_line;

/// Quote forms in priority order: opening marker, closing quote.
const QUOTE_FORMS: &[(&str, char)] = &[("$'", '\''), ("'", '\''), ("$\"", '"'), ("\"", '"')];

/// Strip one layer of quoting and a stray leading `$` from a single token.
///
/// Escape sequences inside `$'...'` are kept verbatim. A token that mentions
/// a URL scheme keeps its leading `$`.
pub fn unquote_token(raw: &str) -> String {
    let token = raw.trim();
    let inner = QUOTE_FORMS
        .iter()
        .find_map(|(open, close)| token.strip_prefix(open)?.strip_suffix(*close))
        .unwrap_or(token);
    strip_dollar(inner).to_string()
}

/// True when the text carries an `http://` or `https://` scheme anywhere.
pub fn has_url_scheme(text: &str) -> bool {
    text.contains("http://") || text.contains("https://")
}

fn strip_dollar(token: &str) -> &str {
    match token.strip_prefix('$') {
        Some(rest) if !has_url_scheme(token) => rest,
        _ => token,
    }
}
