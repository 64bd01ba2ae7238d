//! Error types and reporting for the converter.
//!
//! Functions return `ConvertError` instead of bare strings so callers can
//! tell a malformed command apart from a command that simply has no URL:
//! - Error kind (parsing, missing URL, config)
//! - Human-readable message
//! - Optional hint about what input caused the error
//! - Optional byte position for pointing to the problem location

use std::fmt;

/// Categorized error types for better diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced quoting or a dangling escape in the curl command
    Parse,
    /// No `http://` or `https://` URL among the tokens
    MissingUrl,
    /// Error loading/parsing configuration
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Parse => write!(f, "Parse error"),
            ErrorKind::MissingUrl => write!(f, "Missing URL"),
            ErrorKind::Config => write!(f, "Config error"),
        }
    }
}

/// Rich error type with context information
#[derive(Debug, Clone)]
pub struct ConvertError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was being processed
    pub context: Option<String>,
    /// Byte position in input where the error occurred
    pub position: Option<usize>,
}

impl ConvertError {
    /// Create a new error with just the kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ConvertError {
            kind,
            message: message.into(),
            context: None,
            position: None,
        }
    }

    /// Add context string (e.g., "Close the quote opened here")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add byte position in input where error occurred
    pub fn with_position(mut self, pos: usize) -> Self {
        self.position = Some(pos);
        self
    }

    /// Format error with a snippet of the input showing where the problem is
    pub fn display_with_input(&self, input: &str) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);

        if let Some(pos) = self.position.filter(|pos| *pos < input.len()) {
            let start = floor_char_boundary(input, pos.saturating_sub(15));
            let end = floor_char_boundary(input, (pos + 15).min(input.len()));
            let snippet = &input[start..end];

            msg.push_str(&format!("\n  near: '{}'", snippet.replace('\n', "↵")));
            msg.push('\n');

            let offset = input[start..pos].chars().count();
            msg.push_str(&format!("  {}{}", " ".repeat(offset + 9), "^"));
        } else if let Some(pos) = self.position {
            msg.push_str(&format!("\n  at position {} (end of input)", pos));
        }
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }

        msg
    }

    /// Simplified display without input context
    pub fn display_simple(&self) -> String {
        let mut msg = format!("{}: {}", self.kind, self.message);
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }
        msg
    }
}

fn floor_char_boundary(input: &str, mut idx: usize) -> usize {
    while idx > 0 && !input.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_simple())
    }
}

impl std::error::Error for ConvertError {}

/// Convenience type alias for Results with ConvertError
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_lands_under_position() {
        let input = "curl 'https://x.test/p";
        let err = ConvertError::new(ErrorKind::Parse, "Unterminated ' quote").with_position(5);
        let shown = err.display_with_input(input);
        assert!(shown.starts_with("Parse error: Unterminated ' quote"));
        let lines: Vec<&str> = shown.lines().collect();
        assert_eq!(lines[1], "  near: 'curl 'https://x.test'");
        // "  near: '" is 9 columns wide, then 5 characters into the snippet.
        assert_eq!(lines[2].find('^'), Some(2 + 9 + 5));
    }

    #[test]
    fn position_past_end_is_reported() {
        let err = ConvertError::new(ErrorKind::Parse, "Dangling escape").with_position(40);
        assert!(err.display_with_input("curl").contains("at position 40 (end of input)"));
    }

    #[test]
    fn simple_display_includes_hint() {
        let err = ConvertError::new(ErrorKind::MissingUrl, "No URL found in curl command")
            .with_context("Add an http:// or https:// URL");
        assert_eq!(
            err.to_string(),
            "Missing URL: No URL found in curl command\n  hint: Add an http:// or https:// URL"
        );
    }
}
