// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Parser (spec §4.3 "Parsing").
//!
//! Each token becomes one AST node. `PARAM`/`INPUT`/`SECRET` tokens are not
//! materialized as executable nodes — they populate the shared parameter
//! store instead. `WORKFLOW`/`TASK`/`AGENT`/`PARALLEL`/`SEQUENCE` arguments
//! are themselves nested DSL lines (the "structured form" the data model
//! names): each one is recursively tokenized and parsed into a child node.
//! This nested-line reading is an implementation decision for an
//! underspecified grammar detail — recorded in the design ledger.

use std::collections::BTreeMap;

use praxis_types::{ArgMap, AstKind, AstNode, DslValue, Keyword, Token};

use crate::error::DslError;
use crate::lexer::tokenize_line;

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub nodes: Vec<AstNode>,
    pub params: BTreeMap<String, DslValue>,
    pub secrets: BTreeMap<String, String>,
}

pub fn parse(tokens: &[Token]) -> Result<ParseOutput, DslError> {
    let mut out = ParseOutput::default();
    for token in tokens {
        match token.keyword {
            Keyword::Param | Keyword::Input => {
                for (k, v) in parse_key_value_args(&token.args) {
                    out.params.insert(k, DslValue::String(v));
                }
            }
            Keyword::Secret => {
                for (k, v) in parse_key_value_args(&token.args) {
                    out.secrets.insert(k, v);
                }
            }
            _ => out.nodes.push(parse_token(token)?),
        }
    }
    Ok(out)
}

fn parse_token(token: &Token) -> Result<AstNode, DslError> {
    match token.keyword {
        Keyword::Call => {
            let tool_name = token
                .args
                .first()
                .cloned()
                .ok_or(DslError::MissingToolName)?;
            let rest = &token.args[1..];
            let mut node = AstNode::new(AstKind::Call, "CALL");
            node.args = parse_call_args(&tool_name, rest);
            node.tool_name = Some(tool_name);
            Ok(node)
        }
        Keyword::Workflow | Keyword::Task | Keyword::Agent | Keyword::Parallel | Keyword::Sequence => {
            let kind = AstKind::from(token.keyword);
            let mut node = AstNode::new(kind, token.keyword.as_str());
            for arg in &token.args {
                let child_token = tokenize_line(arg)?;
                node.children.push(parse_token(&child_token)?);
            }
            Ok(node)
        }
        Keyword::Param | Keyword::Input | Keyword::Secret => {
            unreachable!("PARAM/INPUT/SECRET are consumed by parse(), never by parse_token")
        }
    }
}

/// `key=value` or bare `key` pairs; values are trimmed of surrounding quotes.
fn parse_key_value_args(args: &[String]) -> Vec<(String, String)> {
    args.iter()
        .map(|a| match a.split_once('=') {
            Some((k, v)) => (k.to_string(), trim_quotes(v)),
            None => (a.clone(), String::new()),
        })
        .collect()
}

fn trim_quotes(s: &str) -> String {
    s.trim_matches('"').to_string()
}

const FILENAME_TOOLS: [&str; 3] = ["read_file", "delete_file", "write_file"];

fn parse_call_args(tool_name: &str, rest: &[String]) -> ArgMap {
    let mut args = ArgMap::new();
    let mut i = 0;
    let mut positional_index = 0usize;
    let mut seen_flag = false;

    while i < rest.len() {
        let field = &rest[i];
        if let Some(flag_name) = field.strip_prefix("--") {
            seen_flag = true;
            if i + 1 < rest.len() && !rest[i + 1].starts_with("--") {
                args.insert(flag_name.to_string(), DslValue::str(rest[i + 1].clone()));
                i += 2;
            } else {
                args.insert(flag_name.to_string(), DslValue::Bool(true));
                i += 1;
            }
            continue;
        }

        if !seen_flag && tool_name == "write_file" && positional_index == 1 {
            let content = rest[i..].join(" ");
            args.insert("content".to_string(), DslValue::str(trim_quotes(&content)));
            positional_index += 1;
            break;
        }

        let name = positional_name(tool_name, positional_index);
        args.insert(name, DslValue::str(field.clone()));
        positional_index += 1;
        i += 1;
    }

    args
}

fn positional_name(tool_name: &str, positional_index: usize) -> String {
    if positional_index == 0 && FILENAME_TOOLS.contains(&tool_name) {
        return "filename".to_string();
    }
    if positional_index == 0 && tool_name == "list_files" {
        return "directory".to_string();
    }
    format!("arg{positional_index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_text(text: &str) -> ParseOutput {
        parse(&tokenize(text).unwrap()).unwrap()
    }

    #[test]
    fn simple_call_maps_first_positional_to_filename() {
        let out = parse_text("CALL read_file test.txt");
        let node = &out.nodes[0];
        assert_eq!(node.tool_name.as_deref(), Some("read_file"));
        assert_eq!(node.args.get("filename").unwrap().as_str(), Some("test.txt"));
    }

    #[test]
    fn quoted_multiword_write_file_splits_filename_and_content() {
        let out = parse_text("CALL write_file \"my file.txt\" \"Hello World\"");
        let node = &out.nodes[0];
        assert_eq!(node.args.get("filename").unwrap().as_str(), Some("my file.txt"));
        assert_eq!(node.args.get("content").unwrap().as_str(), Some("Hello World"));
    }

    #[test]
    fn flag_parsing_handles_boolean_and_key_value_flags() {
        let out = parse_text("CALL tool --flag --key value");
        let node = &out.nodes[0];
        assert_eq!(node.args.get("flag").unwrap().as_bool(), Some(true));
        assert_eq!(node.args.get("key").unwrap().as_str(), Some("value"));
    }

    #[test]
    fn unknown_tool_uses_generic_positional_names() {
        let out = parse_text("CALL mystery alpha beta");
        let node = &out.nodes[0];
        assert_eq!(node.args.get("arg0").unwrap().as_str(), Some("alpha"));
        assert_eq!(node.args.get("arg1").unwrap().as_str(), Some("beta"));
    }

    #[test]
    fn call_without_tool_name_is_an_error() {
        let err = parse(&[Token {
            keyword: Keyword::Call,
            args: vec![],
        }])
        .unwrap_err();
        assert_eq!(err, DslError::MissingToolName);
    }

    #[test]
    fn secret_tokens_populate_secrets_not_params() {
        let out = parse_text("SECRET k=K123");
        assert_eq!(out.secrets.get("k").map(String::as_str), Some("K123"));
        assert!(out.params.is_empty());
        assert!(out.nodes.is_empty());
    }

    #[test]
    fn param_token_values_are_trimmed_of_quotes() {
        let out = parse_text("PARAM username=\"alice\"");
        assert_eq!(
            out.params.get("username").and_then(DslValue::as_str),
            Some("alice")
        );
    }

    #[test]
    fn parallel_argument_lines_become_child_call_nodes() {
        let out = parse_text("PARALLEL \"CALL read_file a.txt\" \"CALL read_file b.txt\"");
        let node = &out.nodes[0];
        assert_eq!(node.kind, AstKind::Parallel);
        assert_eq!(node.children.len(), 2);
        assert!(node.children.iter().all(AstNode::is_call));
    }
}
