// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Cooperative cancellation signal (spec §5 "Suspension points" /
//! "Cancellation & timeouts").
//!
//! A `tokio::sync::watch` cell rather than a bespoke atomic: cancellation is
//! a one-shot "has this been requested yet" flip that every clone must see
//! immediately, which is exactly what `watch` guarantees without polling.

use tokio::sync::watch;

#[derive(Clone)]
pub struct CancellationToken(watch::Receiver<bool>);

pub struct CancellationSource(watch::Sender<bool>);

impl CancellationSource {
    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

pub fn cancellation_pair() -> (CancellationSource, CancellationToken) {
    let (tx, rx) = watch::channel(false);
    (CancellationSource(tx), CancellationToken(rx))
}

impl CancellationToken {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// A token that never cancels, for callers that have no cancellation
    /// source of their own (e.g. a one-shot `analyze_dsl` call).
    pub fn never() -> Self {
        cancellation_pair().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_cancelled_by_default() {
        let token = CancellationToken::never();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_observed_by_every_clone() {
        let (source, token) = cancellation_pair();
        let clone = token.clone();
        source.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }
}
