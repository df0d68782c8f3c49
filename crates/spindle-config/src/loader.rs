// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./spindle.toml` > `~/.config/spindle/spindle.toml` >
//! `/etc/spindle/spindle.toml` with environment variable overrides via the
//! `SPINDLE_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SpindleConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/spindle/spindle.toml` (system-wide)
/// 3. `~/.config/spindle/spindle.toml` (user XDG config)
/// 4. `./spindle.toml` (local directory)
/// 5. `SPINDLE_*` environment variables
pub fn load_config() -> Result<SpindleConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SpindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SpindleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SpindleConfig::default()))
        .merge(Toml::file("/etc/spindle/spindle.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("spindle/spindle.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("spindle.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SPINDLE_DISCOVERY_SEARCH_PATH` must map to
/// `discovery.search_path`, not `discovery.search.path`.
fn env_provider() -> Env {
    Env::prefixed("SPINDLE_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("discovery_", "discovery.", 1)
            .replacen("logging_", "logging.", 1)
            .into()
    })
}
