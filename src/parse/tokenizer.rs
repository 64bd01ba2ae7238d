//! Tokenizer for captured curl command lines.
//!
//! Uses Normal/Single/Double modes to follow POSIX shell word splitting, then
//! runs every word through [`unquote_token`] so exporter leftovers such as
//! `$'...'` collapse to their plain value.
use log::debug;

use crate::error::{ConvertError, ConvertResult, ErrorKind};
use crate::parse::unquote_token;

#[derive(Copy, Clone, Eq, PartialEq)]
enum ParseMode {
    Normal,
    Single,
    Double,
}

/// Split a command line into unquoted tokens.
pub fn parse_line(input: &str) -> ConvertResult<Vec<String>> {
    let words = split_words(input)?;
    let tokens: Vec<String> = words.iter().map(|word| unquote_token(word)).collect();
    debug!("tokenize event=done count={}", tokens.len());
    Ok(tokens)
}

/// Split a command line into shell words without the unquoting pass.
pub fn split_words(input: &str) -> ConvertResult<Vec<String>> {
    let mut args = Vec::new();
    let mut buf = String::new();
    let mut chars = input.char_indices().peekable();
    let mut mode = ParseMode::Normal;
    let mut in_token = false;
    // Byte offset of the quote that opened the current Single/Double run.
    let mut quote_start = 0usize;

    while let Some((idx, ch)) = chars.next() {
        match mode {
            ParseMode::Normal => match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    if in_token {
                        args.push(std::mem::take(&mut buf));
                        in_token = false;
                    }
                }
                '\\' => match chars.next() {
                    // Line continuation from multi-line "copy as curl" exports.
                    Some((_, '\n')) => {}
                    Some((_, next)) => {
                        in_token = true;
                        buf.push(next);
                    }
                    None => {
                        return Err(ConvertError::new(
                            ErrorKind::Parse,
                            "No escaped character after trailing backslash",
                        )
                        .with_position(idx));
                    }
                },
                '\'' => {
                    in_token = true;
                    mode = ParseMode::Single;
                    quote_start = idx;
                }
                '"' => {
                    in_token = true;
                    mode = ParseMode::Double;
                    quote_start = idx;
                }
                _ => {
                    in_token = true;
                    buf.push(ch);
                }
            },
            ParseMode::Single => {
                if ch == '\'' {
                    mode = ParseMode::Normal;
                } else {
                    buf.push(ch);
                }
            }
            ParseMode::Double => match ch {
                '"' => mode = ParseMode::Normal,
                '\\' => match chars.peek() {
                    Some(&(_, next @ ('"' | '\\' | '$' | '`'))) => {
                        chars.next();
                        buf.push(next);
                    }
                    Some(&(_, '\n')) => {
                        chars.next();
                    }
                    _ => buf.push('\\'),
                },
                _ => buf.push(ch),
            },
        }
    }

    if mode != ParseMode::Normal {
        let quote_char = match mode {
            ParseMode::Single => "'",
            ParseMode::Double => "\"",
            ParseMode::Normal => unreachable!(),
        };
        return Err(ConvertError::new(
            ErrorKind::Parse,
            format!("Unterminated {} quote", quote_char),
        )
        .with_context(format!("Close the {} quote opened here", quote_char))
        .with_position(quote_start));
    }

    if in_token {
        args.push(buf);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_basic() {
        let tokens = parse_line("curl -X POST https://x.test/").unwrap();
        assert_eq!(tokens, vec!["curl", "-X", "POST", "https://x.test/"]);
    }

    #[test]
    fn quoting_and_escaping() {
        let words = split_words("curl -H \"ab\\\"cd\"").unwrap();
        assert_eq!(words[2], "ab\"cd");

        let words = split_words("curl 'single # and $'").unwrap();
        assert_eq!(words[1], "single # and $");

        let words = split_words("printf 'a b' \"ab\"\"cd\" \"\"").unwrap();
        assert_eq!(words, vec!["printf", "a b", "abcd", ""]);
    }

    #[test]
    fn backslash_outside_quotes_is_literal_next_char() {
        let words = split_words("curl foo\\ bar a\\nb").unwrap();
        assert_eq!(words, vec!["curl", "foo bar", "anb"]);
    }

    #[test]
    fn backslash_in_double_quotes_keeps_ordinary_chars() {
        let words = split_words(r#"curl "a\nb" "c\$d" "e\\f""#).unwrap();
        assert_eq!(words, vec!["curl", r"a\nb", "c$d", r"e\f"]);
    }

    #[test]
    fn double_quotes_unescape_posix_set() {
        let words = split_words("\"X: a\\`b\\\"c\" \"d\\\ne\"").unwrap();
        assert_eq!(words, vec!["X: a`b\"c", "de"]);
    }

    #[test]
    fn line_continuations_are_dropped() {
        let input = "curl 'https://x.test/' \\\n  -H 'Accept: */*' \\\n  --compressed";
        let tokens = parse_line(input).unwrap();
        assert_eq!(
            tokens,
            vec!["curl", "https://x.test/", "-H", "Accept: */*", "--compressed"]
        );
    }

    #[test]
    fn ansi_c_quote_collapses_through_unquote() {
        // The shell word is `$abc`; the unquote pass drops the stray `$`.
        assert_eq!(split_words("$'abc'").unwrap(), vec!["$abc"]);
        assert_eq!(parse_line("$'abc'").unwrap(), vec!["abc"]);
        assert_eq!(
            parse_line("$'https://x.test/'").unwrap(),
            vec!["$https://x.test/"]
        );
    }

    #[test]
    fn operators_are_plain_characters() {
        let words = split_words("curl a|b c;d #e").unwrap();
        assert_eq!(words, vec!["curl", "a|b", "c;d", "#e"]);
    }

    #[test]
    fn error_cases() {
        let err = parse_line("curl 'https://x.test/p").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.message, "Unterminated ' quote");
        assert_eq!(err.position, Some(5));

        let err = parse_line("curl -d \"a=1").unwrap_err();
        assert_eq!(err.message, "Unterminated \" quote");
        assert_eq!(err.position, Some(8));

        let err = parse_line("curl x \\").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(err.position, Some(7));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(parse_line("").unwrap().is_empty());
        assert!(parse_line("  \t\n").unwrap().is_empty());
    }
}
