//! Registry configuration.
//!
//! All fields carry serde defaults so a configuration file only needs to
//! name the values it overrides.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Path to the store file. When unset the registry runs in memory,
    /// which is intended for tests.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    /// Password hashing configuration.
    #[serde(default)]
    pub password: PasswordConfig,
    /// Input validation limits.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Password hashing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// bcrypt cost factor. Larger is slower and harder to brute-force.
    #[serde(default = "default_hash_cost")]
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { cost: default_hash_cost() }
    }
}

fn default_hash_cost() -> u32 {
    10
}

/// Input validation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Maximum UTF-8 byte length of name-like fields.
    #[serde(default = "default_max_name_bytes")]
    pub max_name_bytes: usize,
    /// Maximum UTF-8 byte length of an email address.
    #[serde(default = "default_max_email_bytes")]
    pub max_email_bytes: usize,
    /// Maximum UTF-8 byte length of note content.
    #[serde(default = "default_max_note_bytes")]
    pub max_note_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_bytes: default_max_name_bytes(),
            max_email_bytes: default_max_email_bytes(),
            max_note_bytes: default_max_note_bytes(),
        }
    }
}

fn default_max_name_bytes() -> usize {
    128
}

fn default_max_email_bytes() -> usize {
    254
}

fn default_max_note_bytes() -> usize {
    4096
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert!(config.data_path.is_none());
        assert_eq!(config.password.cost, 10);
        assert_eq!(config.validation.max_note_bytes, 4096);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"password": {"cost": 4}}"#).expect("deserialize");
        assert_eq!(config.password.cost, 4);
        assert_eq!(config.validation.max_name_bytes, 128);
        assert!(config.data_path.is_none());
    }
}
