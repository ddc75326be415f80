// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Tokenizer (spec §4.3 "Tokenization").
//!
//! Input is split on newlines. Blank lines and lines beginning with `#` are
//! skipped. Each remaining line is split into whitespace-separated fields,
//! except that a double-quote opens a quoted field running to the next
//! unescaped double-quote; a backslash escapes the single character that
//! follows it (including a quote or another backslash).

use praxis_types::{Keyword, Token};

use crate::error::DslError;

pub fn tokenize(text: &str) -> Result<Vec<Token>, DslError> {
    let mut tokens = Vec::new();
    for line in text.split('\n') {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        tokens.push(tokenize_line(line)?);
    }
    Ok(tokens)
}

/// Tokenize a single line. Used both for the top-level multi-line input and
/// recursively for nested structured-form arguments (a `WORKFLOW`/
/// `PARALLEL`/`SEQUENCE`/`TASK`/`AGENT` token's arguments are themselves
/// nested DSL lines).
pub fn tokenize_line(line: &str) -> Result<Token, DslError> {
    let fields = split_fields(line);
    let mut iter = fields.into_iter();
    let keyword_str = iter
        .next()
        .ok_or_else(|| DslError::UnrecognizedKeyword(String::new()))?;
    let keyword = Keyword::from_str(&keyword_str)
        .ok_or_else(|| DslError::UnrecognizedKeyword(keyword_str.clone()))?;
    Ok(Token {
        keyword,
        args: iter.collect(),
    })
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut has_current = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                current.push(next);
                has_current = true;
            }
            continue;
        }
        if c == '"' {
            in_quotes = !in_quotes;
            has_current = true;
            continue;
        }
        if c.is_whitespace() && !in_quotes {
            if has_current {
                fields.push(std::mem::take(&mut current));
                has_current = false;
            }
            continue;
        }
        current.push(c);
        has_current = true;
    }
    if has_current {
        fields.push(current);
    }
    fields
}

/// Quote a field back up if it contains whitespace, for round-trip tests.
fn requote(field: &str) -> String {
    if field.chars().any(char::is_whitespace) {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let tokens = tokenize("\n# a comment\nCALL read_file a.txt\n").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].keyword, Keyword::Call);
    }

    #[test]
    fn quoted_field_preserves_internal_whitespace() {
        let token = tokenize_line("CALL write_file \"my file.txt\" \"Hello World\"").unwrap();
        assert_eq!(token.args, vec!["write_file", "my file.txt", "Hello World"]);
    }

    #[test]
    fn backslash_escapes_single_character() {
        let token = tokenize_line("CALL t a\\ b c").unwrap();
        assert_eq!(token.args, vec!["t", "a b", "c"]);
    }

    #[test]
    fn unrecognized_first_field_is_an_error() {
        let err = tokenize_line("BOGUS foo").unwrap_err();
        assert_eq!(err, DslError::UnrecognizedKeyword("BOGUS".to_string()));
    }

    #[test]
    fn round_trip_for_balanced_quotes() {
        let original = "CALL write_file \"my file.txt\" \"Hello World\"";
        let token = tokenize_line(original).unwrap();

        let mut fields = vec![token.keyword.as_str().to_string()];
        fields.extend(token.args.iter().map(|f| requote(f)));
        let rejoined = fields.join(" ");

        let reparsed = tokenize_line(&rejoined).unwrap();
        assert_eq!(token, reparsed);
    }
}
