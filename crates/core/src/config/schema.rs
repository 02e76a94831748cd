//! Configuration schema definitions

use crate::adapter::EnumPolicy;
use crate::property::DefaultPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[bindings]`: policies applied to new bindings
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// `[preferences]`: where preference files live
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// `[resources]`: resource table and density
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// `[logging]`
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Binding behaviour defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BindingsConfig {
    /// Absent-key handling: `in-memory` or `materialize`
    #[serde(default)]
    pub default_policy: DefaultPolicy,

    /// Unknown enum constants: `strict` or `lenient`
    #[serde(default)]
    pub enum_policy: EnumPolicy,
}

/// Preference store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Directory holding persisted stores; in-memory stores when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Name of the store returned for the default preferences
    #[serde(default = "default_preferences_name")]
    pub default_name: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            default_name: default_preferences_name(),
        }
    }
}

fn default_preferences_name() -> String {
    "default".to_string()
}

/// Resource table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// TOML resource table to load
    #[serde(default)]
    pub table: Option<PathBuf>,

    /// Pixels per density-independent pixel
    #[serde(default = "default_density")]
    pub density: f32,

    /// Pixels per scaled pixel; falls back to `density`
    #[serde(default)]
    pub scaled_density: Option<f32>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            table: None,
            density: default_density(),
            scaled_density: None,
        }
    }
}

fn default_density() -> f32 {
    1.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `jetpack_core=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Show module targets in log lines
    #[serde(default)]
    pub show_target: bool,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            show_target: false,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
