//! Convert a captured curl command into an ffuf command.
//!
//! The crate exposes the parsing and rendering pipeline so the binary, fuzz
//! targets and tests can link it without pulling in the CLI deps.

pub mod config;
pub mod error;
mod ffuf;
mod fuzz;
mod parse;

pub use config::{apply_env, load_config, load_config_from, ConvertOptions, DEFAULT_WORDLIST};
pub use error::{ConvertError, ConvertResult, ErrorKind};
pub use ffuf::{build_ffuf, shell_quote, FFUF_PROGRAM};
pub use fuzz::{fuzz_body, fuzz_query, FUZZ_MARKER};
pub use parse::{
    extract_request, has_url_scheme, unquote_token, CurlRequest, CURL_PROGRAM, DEFAULT_METHOD,
};

/// Tokenize a curl command line into unquoted tokens.
pub fn parse_tokens(input: &str) -> ConvertResult<Vec<String>> {
    parse::parse_line(input)
}

/// Run the whole pipeline: tokenize, extract, fuzz and render.
///
/// Fails with [`ErrorKind::Parse`] on unbalanced quoting and with
/// [`ErrorKind::MissingUrl`] when no `http://`/`https://` URL is present.
pub fn convert(command: &str, options: &ConvertOptions) -> ConvertResult<String> {
    let tokens = parse::parse_line(command)?;
    let request = parse::extract_request(&tokens);
    let Some(url) = request.url.as_deref() else {
        return Err(ConvertError::new(ErrorKind::MissingUrl, "No URL found in curl command")
            .with_context("The command needs an http:// or https:// URL"));
    };
    Ok(build_ffuf(&request, url, options))
}

/// Fuzz helper for parser-only targets.
pub fn fuzz_convert_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    if let Ok(tokens) = parse::parse_line(&input) {
        let request = parse::extract_request(&tokens);
        if let Some(url) = request.url.as_deref() {
            let _ = build_ffuf(&request, url, &ConvertOptions::default());
        }
    }
}
