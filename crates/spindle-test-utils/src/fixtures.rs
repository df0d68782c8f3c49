// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type catalog fixtures shared by integration tests.
//!
//! The catalog models a small cache/messaging ecosystem:
//!
//! - `spindle.cache.Cache` and `spindle.messaging.Transport` are marked
//!   extension points.
//! - `spindle.cache.LocalCache` is an unmarked sub-interface of
//!   `spindle.cache.Cache`.
//! - `vendor.redis.RedisCache` links against a native client that is not
//!   registered, so it can never be resolved.
//! - A handful of deliberately broken declarations for coherence tests.

use spindle_core::{PluginMarker, StaticTypeCatalog, TypeInfo};

pub const CACHE: &str = "spindle.cache.Cache";
pub const LOCAL_CACHE: &str = "spindle.cache.LocalCache";
pub const TRANSPORT: &str = "spindle.messaging.Transport";
pub const CONFIG_SOURCE: &str = "spindle.config.ConfigSource";

pub const MEMORY_CACHE: &str = "spindle.cache.MemoryCache";
pub const TIERED_CACHE: &str = "spindle.cache.TieredCache";
pub const ABSTRACT_CACHE: &str = "spindle.cache.AbstractCache";
pub const REDIS_CACHE: &str = "vendor.redis.RedisCache";
pub const IN_PROCESS_TRANSPORT: &str = "spindle.messaging.InProcessTransport";
pub const SHADOW_CACHE: &str = "vendor.shadow.ShadowCache";
pub const ENV_SOURCE: &str = "vendor.env.EnvSource";
pub const UNMARKED_HELPER: &str = "spindle.util.Helper";

/// The shared fixture catalog.
pub fn plugin_catalog() -> StaticTypeCatalog {
    StaticTypeCatalog::new()
        .with(
            TypeInfo::interface(CACHE).marked(
                PluginMarker::new("cache")
                    .description("Key/value cache provider")
                    .version("1.0.0"),
            ),
        )
        .with(TypeInfo::interface(LOCAL_CACHE).extends(CACHE))
        .with(TypeInfo::interface(TRANSPORT).marked(PluginMarker::new("transport")))
        // Unmarked: implementations of it alone are incoherent.
        .with(TypeInfo::interface(CONFIG_SOURCE))
        .with(
            TypeInfo::abstract_class(ABSTRACT_CACHE)
                .implements(LOCAL_CACHE)
                .marked(PluginMarker::new("abstract-cache")),
        )
        .with(
            TypeInfo::concrete_class(MEMORY_CACHE)
                .implements(LOCAL_CACHE)
                .marked(PluginMarker::new("memory").version("2.1.0")),
        )
        .with(
            TypeInfo::concrete_class(TIERED_CACHE)
                .extends(ABSTRACT_CACHE)
                .marked(PluginMarker::new("tiered").enabled(false)),
        )
        .with(
            TypeInfo::concrete_class(REDIS_CACHE)
                .implements(CACHE)
                .requires("vendor.redis.native.Client")
                .marked(PluginMarker::new("redis")),
        )
        .with(
            TypeInfo::concrete_class(IN_PROCESS_TRANSPORT)
                .implements(TRANSPORT)
                .marked(PluginMarker::new("in-process")),
        )
        // Same name as MemoryCache.
        .with(
            TypeInfo::concrete_class(SHADOW_CACHE)
                .implements(CACHE)
                .marked(PluginMarker::new("memory")),
        )
        .with(
            TypeInfo::concrete_class(ENV_SOURCE)
                .implements(CONFIG_SOURCE)
                .marked(PluginMarker::new("env")),
        )
        .with(TypeInfo::concrete_class(UNMARKED_HELPER))
}

/// A catalog with one implementation of `spindle.cache.Cache` per entry in
/// `names`, typed `acme.Impl{i}` and carrying that descriptor name.
pub fn catalog_with_implementation_names(names: &[String]) -> StaticTypeCatalog {
    let mut catalog = StaticTypeCatalog::new()
        .with(TypeInfo::interface(CACHE).marked(PluginMarker::new("cache")));
    for (i, name) in names.iter().enumerate() {
        catalog.register(
            TypeInfo::concrete_class(format!("acme.Impl{i}"))
                .implements(CACHE)
                .marked(PluginMarker::new(name.clone())),
        );
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_core::TypeCatalog;

    #[test]
    fn redis_cache_never_links() {
        assert!(plugin_catalog().resolve(REDIS_CACHE).is_err());
    }

    #[test]
    fn generated_catalog_has_one_type_per_name() {
        let names = vec!["a".to_string(), "b".to_string()];
        let catalog = catalog_with_implementation_names(&names);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.lookup("acme.Impl1").is_some());
    }
}
