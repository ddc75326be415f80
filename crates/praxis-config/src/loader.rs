// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Layered config loading: defaults → TOML file → environment overlay.
//!
//! Mirrors `sven-config::loader`'s deep-merge-then-deserialize shape, adapted
//! from a multi-path YAML search to a single explicit TOML file (this
//! runtime has no XDG search path of its own yet) plus a `PRAXIS_`-prefixed
//! environment overlay applied after the file layer.

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Load configuration: start from defaults, merge in `path` if given, then
/// apply any recognized `PRAXIS_*` environment variables on top.
pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::value::Table::new());

    if let Some(p) = path {
        debug!(path = %p.display(), "loading config file");
        let text = std::fs::read_to_string(p)
            .with_context(|| format!("reading {}", p.display()))?;
        let layer: toml::Value =
            toml::from_str(&text).with_context(|| format!("parsing {}", p.display()))?;
        merge_toml(&mut merged, layer);
    }

    let mut config: Config = if matches!(&merged, toml::Value::Table(t) if t.is_empty()) {
        Config::default()
    } else {
        merged.try_into().context("deserializing merged config")?
    };

    apply_env_overlay(&mut config);
    Ok(config)
}

/// Deep-merge `src` into `dst`; `src` wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::value::Table::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

/// Overlays a small set of `PRAXIS_*` environment variables onto an already
/// loaded config. Unset variables leave the existing value untouched.
fn apply_env_overlay(config: &mut Config) {
    if let Ok(v) = std::env::var("PRAXIS_AGENT_NAME") {
        config.agent.name = v;
    }
    if let Ok(v) = std::env::var("PRAXIS_LISTEN_ADDR") {
        config.network.listen_addr = v;
    }
    if let Ok(v) = std::env::var("PRAXIS_ROOM") {
        config.network.room = v;
    }
    if let Ok(v) = std::env::var("PRAXIS_CACHE_MAX_SIZE") {
        if let Ok(n) = v.parse() {
            config.cache.max_size = n;
        }
    }
    if let Ok(v) = std::env::var("PRAXIS_CACHE_TTL_SECS") {
        if let Ok(n) = v.parse() {
            config.cache.ttl_secs = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst: toml::Value = toml::from_str("x = 1").unwrap();
        let src: toml::Value = toml::from_str("x = 2").unwrap();
        merge_toml(&mut dst, src);
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_nested_tables_preserve_untouched_keys() {
        let mut dst: toml::Value = toml::from_str(
            "[agent]\nname = \"a\"\nversion = \"1.0\"",
        )
        .unwrap();
        let src: toml::Value = toml::from_str("[agent]\nname = \"b\"").unwrap();
        merge_toml(&mut dst, src);
        assert_eq!(dst["agent"]["name"].as_str(), Some("b"));
        assert_eq!(dst["agent"]["version"].as_str(), Some("1.0"));
    }

    #[test]
    fn load_with_no_path_returns_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg.network.room, "praxis");
    }

    #[test]
    fn load_missing_explicit_path_is_an_error() {
        let result = load(Some(Path::new("/tmp/praxis_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[agent]\nname = \"custom\"\nversion = \"9.9\"").unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.agent.name, "custom");
        assert_eq!(cfg.agent.version, "9.9");
    }
}
