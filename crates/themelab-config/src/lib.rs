//! Configuration management for themelab.
//!
//! Parses `themelab.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `generator.command`
//! - `dev_server.hostname`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the generator template.
    pub template: Option<String>,
    /// Override the dev server protocol.
    pub protocol: Option<String>,
    /// Override the dev server hostname.
    pub hostname: Option<String>,
    /// Override the dev server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "themelab.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External generator configuration.
    pub generator: GeneratorConfig,
    /// Dev server connection configuration.
    pub dev_server: DevServerConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            dev_server: DevServerConfig::default(),
            config_path: None,
        }
    }
}

/// External generator configuration.
///
/// Describes how the external app generator is invoked and which pinned
/// companion-scripts reference is passed to it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Program used to run the generator.
    pub command: String,
    /// Generator package name.
    pub package: String,
    /// Pinned generator version.
    pub version: String,
    /// Pinned companion-scripts reference passed via `--scripts-version`.
    pub scripts_version: String,
    /// Default template name.
    pub template: String,
    /// Template name used when TypeScript is requested.
    pub typescript_template: String,
    /// Subdirectory of the project root the generated app lands in.
    pub app_subdir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "npx".to_owned(),
            package: "create-react-app".to_owned(),
            version: "5.1.0".to_owned(),
            scripts_version: "^1.0.0-lab.3".to_owned(),
            template: "labtheme".to_owned(),
            typescript_template: "labtheme-typescript".to_owned(),
            app_subdir: "react-src".to_owned(),
        }
    }
}

impl GeneratorConfig {
    /// Versioned package spec, e.g. `create-react-app@5.1.0`.
    #[must_use]
    pub fn package_spec(&self) -> String {
        format!("{}@{}", self.package, self.version)
    }
}

/// Dev server connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    /// WebSocket protocol, `ws` or `wss`.
    pub protocol: String,
    /// Dev server hostname.
    pub hostname: String,
    /// Dev server port.
    pub port: u16,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            protocol: "ws".to_owned(),
            hostname: "127.0.0.1".to_owned(),
            port: 8097,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`dev_server.hostname`").
        field: String,
        /// Error message (e.g., "${`THEMELAB_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `themelab.toml` in current directory and
    /// parents, falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template) = &settings.template {
            self.generator.template.clone_from(template);
        }
        if let Some(protocol) = &settings.protocol {
            self.dev_server.protocol.clone_from(protocol);
        }
        if let Some(hostname) = &settings.hostname {
            self.dev_server.hostname.clone_from(hostname);
        }
        if let Some(port) = settings.port {
            self.dev_server.port = port;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.generator.command, "generator.command")?;
        require_non_empty(&self.generator.package, "generator.package")?;
        require_non_empty(&self.generator.template, "generator.template")?;
        require_non_empty(&self.generator.app_subdir, "generator.app_subdir")?;
        require_non_empty(&self.dev_server.hostname, "dev_server.hostname")?;

        if !matches!(self.dev_server.protocol.as_str(), "ws" | "wss") {
            return Err(ConfigError::Validation(
                "dev_server.protocol must be \"ws\" or \"wss\"".to_owned(),
            ));
        }

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.dev_server.port == 0 {
            return Err(ConfigError::Validation(
                "dev_server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.generator.command = expand::expand_env(&self.generator.command, "generator.command")?;
        self.dev_server.hostname =
            expand::expand_env(&self.dev_server.hostname, "dev_server.hostname")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.command, "npx");
        assert_eq!(config.generator.template, "labtheme");
        assert_eq!(config.generator.app_subdir, "react-src");
        assert_eq!(config.dev_server.protocol, "ws");
        assert_eq!(config.dev_server.hostname, "127.0.0.1");
        assert_eq!(config.dev_server.port, 8097);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.generator.package, "create-react-app");
        assert_eq!(config.dev_server.port, 8097);
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
[generator]
template = "darktheme"
version = "6.0.0"

[dev_server]
protocol = "wss"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.template, "darktheme");
        assert_eq!(config.generator.package_spec(), "create-react-app@6.0.0");
        assert_eq!(config.dev_server.protocol, "wss");
        assert_eq!(config.dev_server.port, 9000);
    }

    #[test]
    fn test_cli_settings_take_precedence() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            template: Some("darktheme".to_owned()),
            protocol: None,
            hostname: Some("devbox".to_owned()),
            port: Some(9000),
        });

        assert_eq!(config.generator.template, "darktheme");
        assert_eq!(config.dev_server.protocol, "ws");
        assert_eq!(config.dev_server.hostname, "devbox");
        assert_eq!(config.dev_server.port, 9000);
    }

    #[test]
    fn test_validate_rejects_bad_protocol() {
        let mut config = Config::default();
        config.dev_server.protocol = "ftp".to_owned();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config = Config::default();
        config.dev_server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_template() {
        let mut config = Config::default();
        config.generator.template = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themelab.toml");
        std::fs::write(&path, "[dev_server]\nport = 4242\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.dev_server.port, 4242);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/themelab.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_config_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themelab.toml");
        std::fs::write(&path, "[dev_server]\nprotocol = \"ftp\"\n").unwrap();

        assert!(Config::load(Some(&path), None).is_err());
    }
}
