// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Tokenizer output and AST node shapes (spec §3, §4.3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{ArgMap, DslValue};

/// Grammar keywords the tokenizer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    Workflow,
    Task,
    Agent,
    Call,
    Parallel,
    Sequence,
    Param,
    Input,
    Secret,
}

impl Keyword {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "WORKFLOW" => Keyword::Workflow,
            "TASK" => Keyword::Task,
            "AGENT" => Keyword::Agent,
            "CALL" => Keyword::Call,
            "PARALLEL" => Keyword::Parallel,
            "SEQUENCE" => Keyword::Sequence,
            "PARAM" => Keyword::Param,
            "INPUT" => Keyword::Input,
            "SECRET" => Keyword::Secret,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Workflow => "WORKFLOW",
            Keyword::Task => "TASK",
            Keyword::Agent => "AGENT",
            Keyword::Call => "CALL",
            Keyword::Parallel => "PARALLEL",
            Keyword::Sequence => "SEQUENCE",
            Keyword::Param => "PARAM",
            Keyword::Input => "INPUT",
            Keyword::Secret => "SECRET",
        }
    }
}

/// One tokenized line: a keyword plus its ordered argument fields.
///
/// `Args` keeps quoted multi-word fields as single entries, matching the
/// tokenizer's quoting rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub keyword: Keyword,
    pub args: Vec<String>,
}

/// Node-kind tag for an AST node (spec §3 "AST Node").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AstKind {
    Workflow,
    Task,
    Agent,
    Call,
    Parallel,
    Sequence,
    Param,
}

impl From<Keyword> for AstKind {
    fn from(k: Keyword) -> Self {
        match k {
            Keyword::Workflow => AstKind::Workflow,
            Keyword::Task => AstKind::Task,
            Keyword::Agent => AstKind::Agent,
            Keyword::Call => AstKind::Call,
            Keyword::Parallel => AstKind::Parallel,
            Keyword::Sequence => AstKind::Sequence,
            // PARAM/INPUT/SECRET nodes populate the param store rather than
            // surviving as their own AST node; callers route these before
            // constructing an AstNode. Treated as Param for completeness.
            Keyword::Param | Keyword::Input | Keyword::Secret => AstKind::Param,
        }
    }
}

/// One AST node. *Invariant: a `Call` node must carry a non-empty tool-name.*
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: AstKind,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    pub args: ArgMap,
    #[serde(default)]
    pub children: Vec<AstNode>,
    #[serde(default)]
    pub params: BTreeMap<String, DslValue>,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

impl AstNode {
    pub fn new(kind: AstKind, command: impl Into<String>) -> Self {
        AstNode {
            kind,
            command: command.into(),
            tool_name: None,
            args: ArgMap::new(),
            children: Vec::new(),
            params: BTreeMap::new(),
            secrets: BTreeMap::new(),
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, AstKind::Call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_round_trips_through_str() {
        for kw in [
            Keyword::Workflow,
            Keyword::Task,
            Keyword::Agent,
            Keyword::Call,
            Keyword::Parallel,
            Keyword::Sequence,
            Keyword::Param,
            Keyword::Input,
            Keyword::Secret,
        ] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn unknown_keyword_text_returns_none() {
        assert_eq!(Keyword::from_str("BOGUS"), None);
    }

    #[test]
    fn call_ast_kind_round_trips_from_keyword() {
        assert_eq!(AstKind::from(Keyword::Call), AstKind::Call);
    }
}
