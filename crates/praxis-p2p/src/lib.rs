// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! P2P protocol layer (spec §4.6): mDNS discovery, capability-card exchange,
//! tool invocation, message/RPC, and Agent-to-Agent JSON-RPC, all running
//! over a single libp2p swarm.

pub mod behaviour;
pub mod codec;
pub mod config;
pub mod error;
pub mod node;
pub mod transport;

pub use config::{LocalToolHandler, P2pConfig};
pub use error::P2pError;
pub use node::{P2pEvent, P2pHandle, P2pNode};
