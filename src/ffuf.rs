//! Rendering the ffuf command line.
use std::borrow::Cow;

use log::debug;

use crate::config::ConvertOptions;
use crate::fuzz::{fuzz_body, fuzz_query};
use crate::parse::{CurlRequest, DEFAULT_METHOD};

pub const FFUF_PROGRAM: &str = "ffuf";

/// Methods whose body is passed on with `-d`.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// Build the ffuf invocation for `request` targeting `url`.
///
/// GET requests are fuzzed in the query string, everything else in the body.
pub fn build_ffuf(
    request: &CurlRequest,
    url: &str,
    options: &ConvertOptions,
) -> String {
    let param = options.param();
    let out_url = if request.method == DEFAULT_METHOD {
        Cow::Owned(fuzz_query(url, param))
    } else {
        Cow::Borrowed(url)
    };

    let mut cmd: Vec<Cow<'_, str>> = vec![
        Cow::Borrowed(FFUF_PROGRAM),
        Cow::Borrowed("-u"),
        shell_quote(&out_url),
        Cow::Borrowed("-X"),
        shell_quote(&request.method),
    ];

    for header in &request.headers {
        cmd.push(Cow::Borrowed("-H"));
        cmd.push(shell_quote(header));
    }

    if let Some(body) = request.body.as_deref().filter(|body| !body.is_empty()) {
        if BODY_METHODS.contains(&request.method.as_str()) {
            let fuzzed = fuzz_body(body, param);
            cmd.push(Cow::Borrowed("-d"));
            cmd.push(shell_quote(&fuzzed).into_owned().into());
        } else {
            debug!("ffuf event=body_dropped method={}", request.method);
        }
    }

    cmd.push(Cow::Borrowed("-w"));
    cmd.push(shell_quote(&options.wordlist));
    cmd.join(" ")
}

/// Quote a value for a POSIX shell.
///
/// Values made only of `[A-Za-z0-9_@%+=:,./-]` pass through; anything else is
/// single-quoted with embedded `'` written as `'"'"'`.
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    if value.is_empty() {
        return Cow::Borrowed("''");
    }
    if value.chars().all(is_shell_safe) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("'{}'", value.replace('\'', "'\"'\"'")))
}

fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}
