// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Complexity classification for planning path A (spec §4.4 step 2).

use praxis_types::{AstKind, AstNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Complex => "complex",
        }
    }
}

/// `complex` if any node is `Parallel`/`Sequence`, more than two `Call`
/// nodes exist (counted recursively through structural children), or more
/// than two nodes total at the top level.
pub fn classify(nodes: &[AstNode]) -> Complexity {
    let has_structural = nodes
        .iter()
        .any(|n| matches!(n.kind, AstKind::Parallel | AstKind::Sequence));
    let call_count: usize = nodes.iter().map(count_calls).sum();

    if has_structural || call_count > 2 || nodes.len() > 2 {
        Complexity::Complex
    } else {
        Complexity::Simple
    }
}

fn count_calls(node: &AstNode) -> usize {
    let self_count = usize::from(node.is_call());
    self_count + node.children.iter().map(count_calls).sum::<usize>()
}

/// Every `Call` node reachable from `nodes`, depth-first, including nested
/// `Parallel`/`Sequence` children — used to drive per-tool agent selection.
pub fn flatten_calls(nodes: &[AstNode]) -> Vec<&AstNode> {
    let mut out = Vec::new();
    for node in nodes {
        collect_calls(node, &mut out);
    }
    out
}

fn collect_calls<'a>(node: &'a AstNode, out: &mut Vec<&'a AstNode>) {
    if node.is_call() {
        out.push(node);
    }
    for child in &node.children {
        collect_calls(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_dsl::{parse, tokenize};

    fn nodes(text: &str) -> Vec<AstNode> {
        parse(&tokenize(text).unwrap()).unwrap().nodes
    }

    #[test]
    fn single_call_is_simple() {
        assert_eq!(classify(&nodes("CALL read_file a.txt")), Complexity::Simple);
    }

    #[test]
    fn parallel_node_is_always_complex() {
        assert_eq!(
            classify(&nodes("PARALLEL \"CALL read_file a.txt\"")),
            Complexity::Complex
        );
    }

    #[test]
    fn more_than_two_calls_is_complex() {
        let text = "CALL a x\nCALL b y\nCALL c z";
        assert_eq!(classify(&nodes(text)), Complexity::Complex);
    }

    #[test]
    fn more_than_two_top_level_nodes_is_complex() {
        let text = "TASK describe\nAGENT describe\nCALL a x";
        assert_eq!(classify(&nodes(text)), Complexity::Complex);
    }

    #[test]
    fn flatten_calls_descends_into_parallel_children() {
        let parsed = nodes("PARALLEL \"CALL a x\" \"CALL b y\"");
        let calls = flatten_calls(&parsed);
        assert_eq!(calls.len(), 2);
    }
}
