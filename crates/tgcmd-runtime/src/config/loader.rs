//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`tgcmd.{profile}.toml`)
//! 3. Main config file (`tgcmd.toml`, then `config.toml`)
//! 4. Environment variables (`TGCMD_*`)
//! 5. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `TGCMD_` prefix with `__` as the nesting
//! separator:
//!
//! - `TGCMD_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `TGCMD_HANDLER__BOT_USERNAME=my_bot` → `handler.bot_username = "my_bot"`
//!
//! # Example
//!
//! ```rust,ignore
//! use tgcmd_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/tgcmd.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::TgcmdConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "TGCMD_";
const PROFILE_VAR: &str = "TGCMD_PROFILE";
const CONFIG_DIR: &str = "tgcmd";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name. `prod` and `dev` are accepted as aliases.
    ///
    /// Built-in names match case-insensitively. Custom names keep their case,
    /// since they name `{stem}.{profile}.toml` files.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            _ => Self::Custom(name.to_string()),
        }
    }

    /// Reads the profile from `TGCMD_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    ///
    /// Without explicit search paths, the current directory and
    /// `<user config dir>/tgcmd` are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, overriding every other source.
    pub fn merge(mut self, config: TgcmdConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads and validates the configuration.
    pub fn load(self) -> ConfigResult<TgcmdConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: TgcmdConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(TgcmdConfig::default()));

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let overrides = std::mem::take(&mut self.figment);
        Ok(figment.merge(overrides))
    }

    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }

        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_DIR));
        }
        paths
    }

    /// Merges the first base file found, preceded by its profile variant.
    #[cfg(feature = "toml-config")]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        for search_path in self.resolve_search_paths() {
            for stem in ["tgcmd", "config"] {
                let profile_path =
                    search_path.join(format!("{stem}.{}.toml", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = figment.merge(Toml::file(&profile_path));
                }

                let base_path = search_path.join(format!("{stem}.toml"));
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    return figment.merge(Toml::file(&base_path));
                }
            }
        }

        warn!("No configuration file found, using defaults");
        figment
    }

    #[cfg(not(feature = "toml-config"))]
    fn load_config_files(&self, figment: Figment) -> Figment {
        trace!(
            paths = ?self.resolve_search_paths(),
            "File configuration disabled, skipping search"
        );
        figment
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<TgcmdConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file, with environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<TgcmdConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    use crate::config::{LogFormat, LogLevel};

    #[test]
    fn test_defaults_without_files() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config, TgcmdConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tgcmd.toml",
                r#"
                [handler]
                message_prefix = "bot: "
                bot_username = "filebot"

                [logging]
                level = "warn"
                format = "pretty"
                "#,
            )?;
            jail.set_env("TGCMD_HANDLER__BOT_USERNAME", "envbot");
            jail.set_env("TGCMD_LOGGING__LEVEL", "debug");

            let config = ConfigLoader::new()
                .profile("dev")
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.handler.message_prefix, "bot: ");
            assert_eq!(config.handler.bot_username.as_deref(), Some("envbot"));
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.format, LogFormat::Pretty);
            Ok(())
        });
    }

    #[test]
    fn test_profile_file_is_overridden_by_base() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tgcmd.production.toml",
                "[logging]\nlevel = \"error\"\nthread_ids = true\n",
            )?;
            jail.create_file("tgcmd.toml", "[logging]\nlevel = \"info\"\n")?;

            let config = ConfigLoader::new()
                .profile("prod")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.logging.level, LogLevel::Info);
            assert!(config.logging.thread_ids);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[handler]\nmessage_prefix = \"> \"\n")?;

            let config = ConfigLoader::new()
                .file(jail.directory().join("custom.toml"))
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.handler.message_prefix, "> ");

            let missing = ConfigLoader::new()
                .file(jail.directory().join("missing.toml"))
                .load();
            assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

            jail.create_file("custom.yaml", "handler: {}\n")?;
            let unsupported = ConfigLoader::new()
                .file(jail.directory().join("custom.yaml"))
                .load();
            assert!(matches!(unsupported, Err(ConfigError::UnsupportedFormat(_))));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("tgcmd.toml", "[handler]\nbot_username = \"@bot\"\n")?;
            let invalid = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(invalid, Err(ConfigError::ValidationError { .. })));

            jail.create_file("tgcmd.toml", "[logging]\nlevel = \"loud\"\n")?;
            let malformed = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(malformed, Err(ConfigError::Extract(_))));
            Ok(())
        });
    }

    #[test]
    fn test_programmatic_merge_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("TGCMD_HANDLER__MESSAGE_PREFIX", "env");

            let mut overrides = TgcmdConfig::default();
            overrides.handler.message_prefix = "code".to_string();

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(overrides)
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.handler.message_prefix, "code");
            Ok(())
        });
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
        assert_eq!(Profile::parse("Staging").as_str(), "Staging");
    }

    #[test]
    fn test_custom_profile_keeps_case() {
        Jail::expect_with(|jail| {
            jail.create_file("tgcmd.Staging.toml", "[logging]\nlevel = \"warn\"\n")?;

            let config = ConfigLoader::new()
                .profile("Staging")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }
}
