// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! DSL analyzer: tokenizer, parser, interpolation, and `execute` (spec
//! §4.3).

pub mod cancel;
pub mod collaborator;
pub mod error;
pub mod execute;
pub mod interpolate;
pub mod lexer;
pub mod mask;
pub mod parser;

pub use cancel::{cancellation_pair, CancellationSource, CancellationToken};
pub use collaborator::AgentCollaborator;
pub use error::DslError;
pub use execute::{execute, ExecCtx};
pub use interpolate::{interpolate_args, interpolate_value};
pub use lexer::{tokenize, tokenize_line};
pub use mask::{mask_secrets, mask_secrets_json};
pub use parser::{parse, ParseOutput};

use std::sync::Arc;

use praxis_cache::ToolCache;
use praxis_types::{AstNode, DslValue, ParamStore};

/// `AnalyzeDSL(ctx, text) → result` (spec §4.3): tokenize, parse, and merge
/// any `PARAM`/`INPUT`/`SECRET` values discovered during parsing into the
/// supplied base store, returning the executable node list alongside the
/// merged store.
pub struct AnalyzeResult {
    pub nodes: Vec<AstNode>,
    pub store: ParamStore,
}

pub fn analyze_dsl(text: &str, base_store: ParamStore) -> Result<AnalyzeResult, DslError> {
    let tokens = tokenize(text)?;
    let parsed = parse(&tokens)?;

    let mut store = base_store;
    for (k, v) in parsed.params {
        store.params.insert(k, v);
    }
    for (k, v) in parsed.secrets {
        store.secrets.insert(k, v);
    }

    Ok(AnalyzeResult {
        nodes: parsed.nodes,
        store,
    })
}

/// Convenience wrapper that analyzes and then immediately executes with no
/// bound agent and a fresh cache — used by the CLI's `validate`/one-shot
/// `run` path when no agent facade is present.
pub async fn run_standalone(text: &str) -> Result<serde_json::Value, DslError> {
    let analyzed = analyze_dsl(text, ParamStore::new())?;
    let ctx = ExecCtx::new(Arc::new(analyzed.store), Arc::new(ToolCache::default()));
    execute(analyzed.nodes, ctx).await
}

#[allow(unused_imports)]
use praxis_types::DslValue as _DslValueReexportCheck;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn analyze_dsl_merges_secret_tokens_into_store() {
        let analyzed = analyze_dsl("SECRET k=K123\nCALL read_file a.txt", ParamStore::new()).unwrap();
        assert_eq!(analyzed.store.secrets.get("k").map(String::as_str), Some("K123"));
        assert_eq!(analyzed.nodes.len(), 1);
    }

    #[tokio::test]
    async fn run_standalone_executes_with_no_agent() {
        let result = run_standalone("CALL read_file test.txt").await.unwrap();
        assert_eq!(result["status"], "completed");
    }
}
