//! Configuration file reading and parsing.
//!
//! This module handles locating, reading, and parsing INI-format configuration files,
//! with support for layered overrides.

use std::env;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;
use tracing::warn;

use crate::fetcher::{DEFAULT_GRAPHQL_PATH, DEFAULT_MAX_ENTRIES};

use super::{Config, EndpointConfig, TreeConfig};

// =============================================================================
// Constants - Default Values
// =============================================================================

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const ENV_CONFIG_FILE: &str = "FILETREE_CONFIG_FILE";
const DEFAULT_CONFIG_FILENAME: &str = ".filetreeconfig";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid integer '{value}' for key '{key}': {source}")]
    InvalidInteger {
        key: String,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid value '{value}' for key '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("invalid override key '{key}': {message}")]
    InvalidOverrideKey { key: String, message: String },
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// =============================================================================
// ConfigSource
// =============================================================================

/// Specifies how to locate and layer configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Explicit config file path. If specified and doesn't exist, error.
    /// If None, fall back to FILETREE_CONFIG_FILE env var, then ~/.filetreeconfig.
    pub config_file: Option<PathBuf>,

    /// Additional override config file (layered on top of base config).
    pub override_file: Option<PathBuf>,

    /// Individual key=value overrides (applied last).
    /// Keys use dot-notation: "tree.max_entries", "endpoint.url"
    pub overrides: Vec<(String, String)>,
}

// =============================================================================
// Value Parsing
// =============================================================================

fn parse_max_entries(key: &str, value: &str) -> Result<NonZeroUsize> {
    let n: usize = value.trim().parse().map_err(|e| ConfigError::InvalidInteger {
        key: key.to_string(),
        value: value.to_string(),
        source: e,
    })?;
    NonZeroUsize::new(n).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: "must be at least 1".to_string(),
    })
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidInteger {
            key: key.to_string(),
            value: value.to_string(),
            source: e,
        })
}

// =============================================================================
// Config File Resolution
// =============================================================================

/// Information about how the config file was resolved.
#[derive(Debug)]
struct ResolvedConfigFile {
    /// The path to the config file, if one was found.
    path: Option<PathBuf>,
    /// Warning message if env var pointed to nonexistent file.
    warning: Option<String>,
}

/// Resolve which config file to use based on the ConfigSource and environment.
fn resolve_config_file(source: &ConfigSource) -> Result<ResolvedConfigFile> {
    if let Some(ref path) = source.config_file {
        if path.exists() {
            return Ok(ResolvedConfigFile {
                path: Some(path.clone()),
                warning: None,
            });
        }
        return Err(ConfigError::FileNotFound(path.clone()));
    }

    if let Ok(env_path) = env::var(ENV_CONFIG_FILE) {
        let path = PathBuf::from(&env_path);
        if path.exists() {
            return Ok(ResolvedConfigFile {
                path: Some(path),
                warning: None,
            });
        }
        return Ok(ResolvedConfigFile {
            path: None,
            warning: Some(format!(
                "config file specified by {} does not exist: {}",
                ENV_CONFIG_FILE, env_path
            )),
        });
    }

    if let Some(home) = env::var_os("HOME").map(PathBuf::from) {
        let default_path = home.join(DEFAULT_CONFIG_FILENAME);
        if default_path.exists() {
            return Ok(ResolvedConfigFile {
                path: Some(default_path),
                warning: None,
            });
        }
    }

    Ok(ResolvedConfigFile {
        path: None,
        warning: None,
    })
}

// =============================================================================
// Default Config
// =============================================================================

/// Create a Config with all default values.
fn default_config() -> Config {
    Config {
        tree: TreeConfig {
            max_entries: DEFAULT_MAX_ENTRIES,
        },
        endpoint: EndpointConfig {
            url: None,
            access_token: None,
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        },
    }
}

// =============================================================================
// INI Parsing
// =============================================================================

/// Apply an INI file's contents to a Config, layering on top of existing values.
fn apply_ini_to_config(config: &mut Config, ini: &Ini) -> Result<()> {
    // [tree] section
    if let Some(value) = ini.get("tree", "max_entries") {
        config.tree.max_entries = parse_max_entries("tree.max_entries", &value)?;
    }

    // [endpoint] section
    if let Some(url) = ini.get("endpoint", "url") {
        config.endpoint.url = Some(url);
    }
    if let Some(token) = ini.get("endpoint", "access_token") {
        config.endpoint.access_token = Some(token);
    }
    if let Some(path) = ini.get("endpoint", "graphql_path") {
        config.endpoint.graphql_path = path;
    }
    if let Some(value) = ini.get("endpoint", "timeout_seconds") {
        config.endpoint.timeout_seconds = parse_seconds("endpoint.timeout_seconds", &value)?;
    }

    Ok(())
}

/// Load and parse an INI file.
fn load_ini(path: &Path) -> Result<Ini> {
    let mut ini = Ini::new();
    ini.load(path).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e,
    })?;
    Ok(ini)
}

// =============================================================================
// Override Application
// =============================================================================

/// Apply a single key=value override to the config.
fn apply_override(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.splitn(2, '.').collect();

    match parts.as_slice() {
        ["tree", "max_entries"] => {
            config.tree.max_entries = parse_max_entries(key, value)?;
            Ok(())
        }
        ["endpoint", param] => apply_endpoint_override(config, param, value),
        _ => Err(ConfigError::InvalidOverrideKey {
            key: key.to_string(),
            message: "unrecognized key format".to_string(),
        }),
    }
}

fn apply_endpoint_override(config: &mut Config, param: &str, value: &str) -> Result<()> {
    match param {
        "url" => config.endpoint.url = Some(value.to_string()),
        "access_token" => config.endpoint.access_token = Some(value.to_string()),
        "graphql_path" => config.endpoint.graphql_path = value.to_string(),
        "timeout_seconds" => {
            config.endpoint.timeout_seconds = parse_seconds("endpoint.timeout_seconds", value)?
        }
        _ => {
            return Err(ConfigError::InvalidOverrideKey {
                key: format!("endpoint.{}", param),
                message: "unknown parameter".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Result of reading configuration, including any warnings.
#[derive(Debug)]
pub struct ConfigResult {
    /// The parsed configuration.
    pub config: Config,
    /// Any warnings generated during config loading.
    pub warnings: Vec<String>,
}

/// Read and parse configuration from the specified sources.
///
/// Configuration is layered in this order:
/// 1. Built-in defaults
/// 2. Base config file (explicit path, env var, or ~/.filetreeconfig)
/// 3. Override config file (if specified)
/// 4. Individual overrides (applied last)
pub fn read_config(source: &ConfigSource) -> Result<ConfigResult> {
    let mut warnings = Vec::new();

    let mut config = default_config();

    let resolved = resolve_config_file(source)?;
    if let Some(warning) = resolved.warning {
        warn!("{}", warning);
        warnings.push(warning);
    }
    if let Some(ref path) = resolved.path {
        let ini = load_ini(path)?;
        apply_ini_to_config(&mut config, &ini)?;
    }

    if let Some(ref override_path) = source.override_file {
        if !override_path.exists() {
            return Err(ConfigError::FileNotFound(override_path.clone()));
        }
        let ini = load_ini(override_path)?;
        apply_ini_to_config(&mut config, &ini)?;
    }

    for (key, value) in &source.overrides {
        apply_override(&mut config, key, value)?;
    }

    Ok(ConfigResult { config, warnings })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.tree.max_entries.get(), 1000);
        assert_eq!(config.endpoint.url, None);
        assert_eq!(config.endpoint.graphql_path, "/.api/graphql");
        assert_eq!(config.endpoint.timeout().as_secs(), 30);
    }

    #[test]
    fn test_apply_override_tree() {
        let mut config = default_config();
        apply_override(&mut config, "tree.max_entries", "250").unwrap();
        assert_eq!(config.tree.max_entries.get(), 250);

        let err = apply_override(&mut config, "tree.max_entries", "0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = apply_override(&mut config, "tree.max_entries", "lots").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInteger { .. }));
        assert_eq!(config.tree.max_entries.get(), 250);
    }

    #[test]
    fn test_apply_override_endpoint() {
        let mut config = default_config();
        apply_override(&mut config, "endpoint.url", "https://code.example.com").unwrap();
        apply_override(&mut config, "endpoint.access_token", "secret").unwrap();
        apply_override(&mut config, "endpoint.timeout_seconds", "5").unwrap();

        assert_eq!(
            config.endpoint.url,
            Some("https://code.example.com".to_string())
        );
        assert_eq!(config.endpoint.access_token, Some("secret".to_string()));
        assert_eq!(config.endpoint.timeout_seconds, 5);
    }

    #[test]
    fn test_apply_override_unknown_keys() {
        let mut config = default_config();
        assert!(matches!(
            apply_override(&mut config, "endpoint.region", "x"),
            Err(ConfigError::InvalidOverrideKey { .. })
        ));
        assert!(matches!(
            apply_override(&mut config, "cache.path", "/tmp"),
            Err(ConfigError::InvalidOverrideKey { .. })
        ));
    }

    #[test]
    fn test_parse_ini_config() {
        let mut ini = Ini::new();
        ini.read(
            r#"
[tree]
max_entries = 500

[endpoint]
url = https://code.example.com
graphql_path = /api/graphql
"#
            .to_string(),
        )
        .unwrap();

        let mut config = default_config();
        apply_ini_to_config(&mut config, &ini).unwrap();

        assert_eq!(config.tree.max_entries.get(), 500);
        assert_eq!(
            config.endpoint.url,
            Some("https://code.example.com".to_string())
        );
        assert_eq!(config.endpoint.graphql_path, "/api/graphql");
        assert_eq!(config.endpoint.access_token, None);
    }

    #[test]
    fn test_read_config_layers() {
        let base = write_config("[tree]\nmax_entries = 200\n\n[endpoint]\nurl = https://a.example.com\n");
        let layer = write_config("[endpoint]\nurl = https://b.example.com\n");

        let source = ConfigSource {
            config_file: Some(base.path().to_path_buf()),
            override_file: Some(layer.path().to_path_buf()),
            overrides: vec![("endpoint.access_token".to_string(), "tok".to_string())],
        };
        let result = read_config(&source).unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(result.config.tree.max_entries.get(), 200);
        assert_eq!(
            result.config.endpoint.url,
            Some("https://b.example.com".to_string())
        );
        assert_eq!(result.config.endpoint.access_token, Some("tok".to_string()));
    }

    #[test]
    fn test_read_config_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigSource {
            config_file: Some(dir.path().join("missing")),
            ..Default::default()
        };
        assert!(matches!(
            read_config(&source),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_read_config_rejects_zero_max_entries() {
        let base = write_config("[tree]\nmax_entries = 0\n");
        let source = ConfigSource {
            config_file: Some(base.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            read_config(&source),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
