// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Transport construction and keypair persistence.
//!
//! Identical in shape to the teacher's `sven-p2p::transport`, minus the
//! relay-client transport leg (the spec's P2P layer is local-network only —
//! see `DESIGN.md`'s "Dropped from the teacher's stack").

use std::{fs, path::Path};

use libp2p::{
    core::{muxing::StreamMuxerBox, upgrade},
    identity, noise,
    swarm::Config as SwarmConfig,
    tcp, yamux, PeerId, Transport,
};

use crate::error::P2pError;

pub fn build_transport(
    key: &identity::Keypair,
) -> Result<libp2p::core::transport::Boxed<(PeerId, StreamMuxerBox)>, P2pError> {
    let noise_config = noise::Config::new(key).map_err(|e| P2pError::Transport(e.to_string()))?;

    let transport = tcp::tokio::Transport::new(tcp::Config::default().nodelay(true))
        .upgrade(upgrade::Version::V1)
        .authenticate(noise_config)
        .multiplex(yamux::Config::default())
        .map(|(p, m), _| (p, StreamMuxerBox::new(m)))
        .boxed();
    Ok(transport)
}

pub fn default_swarm_config() -> SwarmConfig {
    use std::time::Duration;
    SwarmConfig::with_tokio_executor().with_idle_connection_timeout(Duration::from_secs(30))
}

/// Load a persisted keypair from `path`, or generate and persist a fresh one.
pub fn load_or_create_keypair(path: &Path) -> Result<identity::Keypair, P2pError> {
    if path.exists() {
        let raw = fs::read(path).map_err(|e| P2pError::Keypair(e.to_string()))?;
        return identity::Keypair::from_protobuf_encoding(&raw)
            .map_err(|e| P2pError::Keypair(e.to_string()));
    }

    let key = identity::Keypair::generate_ed25519();
    let raw = key
        .to_protobuf_encoding()
        .map_err(|e| P2pError::Keypair(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| P2pError::Keypair(e.to_string()))?;
    }
    fs::write(path, &raw).map_err(|e| P2pError::Keypair(e.to_string()))?;
    tracing::info!("generated new keypair at {}", path.display());
    Ok(key)
}
