// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! P2P protocol layer errors (spec §4.6).

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum P2pError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("dial error: {0}")]
    Dial(String),

    #[error("peer not found: {0}")]
    PeerNotFound(String),

    #[error("request timed out")]
    Timeout,

    #[error("node already shut down")]
    Shutdown,

    #[error("io error: {0}")]
    Io(String),

    #[error("keypair error: {0}")]
    Keypair(String),
}

impl From<std::io::Error> for P2pError {
    fn from(e: std::io::Error) -> Self {
        P2pError::Io(e.to_string())
    }
}
