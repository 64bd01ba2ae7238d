//! Caller configuration: wordlist path and the parameter to fuzz.
//!
//! Defaults are overlaid by `~/.curl2ffufrc`, then by the `CURL2FFUF_*`
//! environment variables. Command-line flags are applied last by the binary.
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::error::{ConvertError, ErrorKind};

pub const DEFAULT_WORDLIST: &str = "wordlist.txt";
pub const RC_FILE_NAME: &str = ".curl2ffufrc";
pub const WORDLIST_ENV: &str = "CURL2FFUF_WORDLIST";
pub const PARAM_ENV: &str = "CURL2FFUF_PARAM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Passed verbatim to ffuf's `-w`.
    pub wordlist: String,
    /// Parameter to mark; `None` marks the first one found.
    pub param: Option<String>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self {
            wordlist: DEFAULT_WORDLIST.to_string(),
            param: None,
        }
    }

    /// The parameter to fuzz, treating an empty name as unset.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref().filter(|name| !name.is_empty())
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `$HOME/.curl2ffufrc` into `options`. A missing file or unset `HOME`
/// leaves `options` alone.
pub fn load_config(options: &mut ConvertOptions) -> io::Result<()> {
    let Some(home) = env::var_os("HOME") else {
        return Ok(());
    };
    load_config_from(&Path::new(&home).join(RC_FILE_NAME), options)
}

pub fn load_config_from(path: &Path, options: &mut ConvertOptions) -> io::Result<()> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    debug!("config event=load path={}", path.display());
    apply_config_lines(options, &content);
    Ok(())
}

/// Apply `key = value` lines. Bad lines are logged and skipped.
pub fn apply_config_lines(options: &mut ConvertOptions, content: &str) {
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = apply_config_line(options, line, idx + 1) {
            warn!("config:{}: {}", idx + 1, err.display_simple());
        }
    }
}

fn apply_config_line(
    options: &mut ConvertOptions,
    line: &str,
    line_no: usize,
) -> Result<(), ConvertError> {
    let (key, value) = line.split_once('=').ok_or_else(|| {
        ConvertError::new(ErrorKind::Config, format!("missing '=' on line {line_no}"))
            .with_context("Expected: key = value")
    })?;
    let key = key.trim();
    let value = strip_quotes(value.trim());
    if key.eq_ignore_ascii_case("wordlist") {
        if value.is_empty() {
            return Err(ConvertError::new(
                ErrorKind::Config,
                format!("empty wordlist on line {line_no}"),
            ));
        }
        options.wordlist = value.to_string();
        return Ok(());
    }
    if key.eq_ignore_ascii_case("param") {
        options.param = Some(value.to_string()).filter(|name| !name.is_empty());
        return Ok(());
    }
    Err(
        ConvertError::new(ErrorKind::Config, format!("unknown key '{key}' on line {line_no}"))
            .with_context("Valid keys: wordlist, param"),
    )
}

/// Overlay `CURL2FFUF_WORDLIST` and `CURL2FFUF_PARAM`.
pub fn apply_env(options: &mut ConvertOptions) {
    if let Ok(wordlist) = env::var(WORDLIST_ENV) {
        let trimmed = wordlist.trim();
        if trimmed.is_empty() {
            warn!("config event=ignore var={} reason=empty", WORDLIST_ENV);
        } else {
            options.wordlist = trimmed.to_string();
        }
    }
    if let Ok(param) = env::var(PARAM_ENV) {
        let trimmed = param.trim();
        if trimmed.is_empty() {
            options.param = None;
        } else {
            options.param = Some(trimmed.to_string());
        }
    }
}

fn strip_quotes(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &input[1..bytes.len() - 1];
        }
    }
    input
}
