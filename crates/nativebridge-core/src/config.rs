//! Adapter configuration
//!
//! Configuration is merged from, in increasing precedence:
//! - Default values
//! - A configuration file (TOML or JSON, chosen by extension)
//! - Environment variables

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BridgeError, Result};

/// Default generic/unchecked failure type
pub const DEFAULT_GENERIC_FAILURE_CLASS: &str = "java.lang.RuntimeException";

/// Default domain exception type
pub const DEFAULT_DOMAIN_FAILURE_CLASS: &str =
    "org.apache.activemq.artemis.api.core.ActiveMQException";

pub const ENV_GENERIC_FAILURE_CLASS: &str = "NATIVEBRIDGE_GENERIC_FAILURE_CLASS";
pub const ENV_DOMAIN_FAILURE_CLASS: &str = "NATIVEBRIDGE_DOMAIN_FAILURE_CLASS";
pub const ENV_DIAGNOSTICS: &str = "NATIVEBRIDGE_DIAGNOSTICS";

/// Which managed types the adapter raises, and whether it writes diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Fully-qualified name of the generic failure type
    pub generic_failure_class: String,

    /// Fully-qualified name of the domain exception type
    pub domain_failure_class: String,

    /// Write lookup-failure diagnostics to the diagnostic sink
    pub diagnostics: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            generic_failure_class: DEFAULT_GENERIC_FAILURE_CLASS.to_string(),
            domain_failure_class: DEFAULT_DOMAIN_FAILURE_CLASS.to_string(),
            diagnostics: true,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config_with_source(format!("Failed to read {}", path.display()), e)
        })?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                BridgeError::config_with_source(format!("Invalid JSON in {}", path.display()), e)
            })?,
            Some("toml") => toml::from_str(&content).map_err(|e| {
                BridgeError::config_with_source(format!("Invalid TOML in {}", path.display()), e)
            })?,
            _ => {
                return Err(BridgeError::config(format!(
                    "Unsupported config format: {}",
                    path.display()
                )))
            }
        };

        config.normalized().validate()
    }

    /// Defaults overridden by the environment
    pub fn load() -> Result<Self> {
        Self::default().with_env_overrides()?.normalized().validate()
    }

    /// Configuration file overridden by the environment
    pub fn load_with_file(path: &Path) -> Result<Self> {
        Self::from_file(path)?.with_env_overrides()?.normalized().validate()
    }

    /// Apply `NATIVEBRIDGE_*` environment variables
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(class) = std::env::var(ENV_GENERIC_FAILURE_CLASS) {
            self.generic_failure_class = class;
        }
        if let Ok(class) = std::env::var(ENV_DOMAIN_FAILURE_CLASS) {
            self.domain_failure_class = class;
        }
        if let Ok(flag) = std::env::var(ENV_DIAGNOSTICS) {
            self.diagnostics = parse_flag(&flag).ok_or_else(|| {
                BridgeError::config(format!("{} must be a boolean, got '{}'", ENV_DIAGNOSTICS, flag))
            })?;
        }
        Ok(self)
    }

    /// Store class names in dotted form
    pub fn normalized(mut self) -> Self {
        self.generic_failure_class = dotted_name(&self.generic_failure_class);
        self.domain_failure_class = dotted_name(&self.domain_failure_class);
        self
    }

    /// Reject class names that cannot name a managed type
    pub fn validate(self) -> Result<Self> {
        for (field, name) in [
            ("generic_failure_class", &self.generic_failure_class),
            ("domain_failure_class", &self.domain_failure_class),
        ] {
            if !is_qualified_name(name) {
                return Err(BridgeError::config(format!(
                    "{} is not a fully-qualified class name: '{}'",
                    field, name
                )));
            }
        }
        Ok(self)
    }

    /// Builder-style override of the domain type
    pub fn domain_failure_class(mut self, name: impl Into<String>) -> Self {
        self.domain_failure_class = dotted_name(&name.into());
        self
    }

    /// Builder-style override of the generic type
    pub fn generic_failure_class(mut self, name: impl Into<String>) -> Self {
        self.generic_failure_class = dotted_name(&name.into());
        self
    }

    /// Builder-style toggle for diagnostics
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `java/lang/Foo` → `java.lang.Foo`
pub fn dotted_name(name: &str) -> String {
    name.trim().replace('/', ".")
}

fn is_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AdapterConfig::default().validate().unwrap();
        assert_eq!(config.generic_failure_class, "java.lang.RuntimeException");
        assert!(config.diagnostics);
    }

    #[test]
    fn test_slash_names_are_normalized() {
        let config = AdapterConfig::default().domain_failure_class("com/example/IoFailure");
        assert_eq!(config.domain_failure_class, "com.example.IoFailure");
    }

    #[test]
    fn test_invalid_names_rejected() {
        for bad in ["", "java..Foo", "1abc.Foo", "java.lang.Run time"] {
            let config = AdapterConfig {
                domain_failure_class: bad.to_string(),
                ..AdapterConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_inner_class_names_accepted() {
        let config = AdapterConfig::default().domain_failure_class("com.example.Outer$Inner");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
