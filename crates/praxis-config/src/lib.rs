// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Layered configuration for the praxis agent runtime.

pub mod loader;
pub mod schema;

pub use loader::load;
pub use schema::{AgentConfig, CacheConfig, Config, DiscoveryConfig, NetworkConfig, TasksConfig};
