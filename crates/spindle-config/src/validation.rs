// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::SpindleConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &SpindleConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let discovery = &config.discovery;

    for (key, value) in [
        ("discovery.interface_manifest", &discovery.interface_manifest),
        ("discovery.implementation_manifest", &discovery.implementation_manifest),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if Path::new(value).is_absolute() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{key} must be relative to the search path roots, got `{value}`"
                ),
            });
        }
    }

    if !discovery.interface_manifest.trim().is_empty()
        && discovery.interface_manifest.trim() == discovery.implementation_manifest.trim()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "discovery.interface_manifest and discovery.implementation_manifest \
                 must differ, both are `{}`",
                discovery.interface_manifest
            ),
        });
    }

    if discovery.standard_namespace.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "discovery.standard_namespace must not be empty".to_string(),
        });
    }

    for root in &discovery.search_path {
        if root.as_os_str().is_empty() {
            errors.push(ConfigError::Validation {
                message: "discovery.search_path entries must not be empty".to_string(),
            });
        }
    }

    if config.logging.filter.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "logging.filter must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
