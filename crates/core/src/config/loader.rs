//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{BindingError, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path, the standard locations, or defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".jetpack.toml", "jetpack.toml", ".config/jetpack.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| BindingError::config(format!("Failed to read config file {path}: {e}")))?;

    toml::from_str(&content)
        .map_err(|e| BindingError::config(format!("Failed to parse config file {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::EnumPolicy;
    use crate::error::ErrorCode;
    use crate::property::DefaultPolicy;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.preferences.default_name, "default");
        assert_eq!(config.schema.bindings.default_policy, DefaultPolicy::InMemory);
        assert!((config.schema.resources.density - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[bindings]
default_policy = "materialize"
enum_policy = "lenient"

[resources]
density = 2.0

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.schema.bindings.default_policy, DefaultPolicy::Materialize);
        assert_eq!(config.schema.bindings.enum_policy, EnumPolicy::Lenient);
        assert!((config.schema.resources.density - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.schema.logging.level, "debug");
        assert_eq!(config.schema.preferences.default_name, "default");
    }

    #[test]
    fn test_config_parse_error() {
        let err = Config::from_toml_str("[bindings]\nenum_policy = \"loose\"").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigParseError);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not = [valid").unwrap();
        let err = Config::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }
}
