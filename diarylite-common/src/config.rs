//! Configuration loading and root folder resolution
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or broken TOML file never stops the service from starting;
//! the compiled defaults are used and the failure is handed back to the
//! caller to log.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "DIARYLITE_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "diarylite.db";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; anything left out falls through to the
/// compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database file
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Address the HTTP server binds to
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was built for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: get_default_root_folder(),
            port: 5080,
            bind_address: "127.0.0.1".to_string(),
            log_level: default_log_level(),
        }
    }
}

/// Parse a TOML config file
pub fn parse_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Where the bootstrap config came from
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No config file exists
    Defaults,
    /// A config file exists but could not be used; defaults apply
    Fallback(Error),
}

/// Load the TOML config, degrading to an empty config on any failure
///
/// With an explicit path, that file is used. Otherwise the platform config
/// location is searched. Nothing is logged here: this runs before tracing
/// is installed, so the caller reports the returned source.
pub fn load_toml_config(explicit_path: Option<&Path>) -> (TomlConfig, ConfigSource) {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_file() {
            Some(path) => path,
            None => return (TomlConfig::default(), ConfigSource::Defaults),
        },
    };

    match parse_toml_config(&path) {
        Ok(config) => (config, ConfigSource::File(path)),
        Err(e) => (TomlConfig::default(), ConfigSource::Fallback(e)),
    }
}

/// Get the platform config file path, if one exists
///
/// Linux also checks `/etc/diarylite/config.toml` after the user config.
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("diarylite").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/diarylite/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/diarylite (or /var/lib/diarylite for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("diarylite"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/diarylite"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/diarylite
        dirs::data_dir()
            .map(|d| d.join("diarylite"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/diarylite"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\diarylite
        dirs::data_local_dir()
            .map(|d| d.join("diarylite"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\diarylite"))
    } else {
        PathBuf::from("./diarylite_data")
    }
}

/// Resolves the root folder from CLI, environment, TOML, then defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: toml.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the root folder and knows where the database lives
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if it is missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub log_level: String,
}

impl ServiceConfig {
    /// Merge CLI overrides over the TOML file over the compiled defaults
    ///
    /// Environment overrides for the port arrive through the CLI layer.
    pub fn resolve(
        cli_root: Option<PathBuf>,
        cli_port: Option<u16>,
        cli_bind: Option<String>,
        toml: &TomlConfig,
    ) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let root_folder = RootFolderResolver::new(cli_root, toml).resolve();

        Self {
            root_folder,
            port: cli_port.or(toml.port).unwrap_or(defaults.port),
            bind_address: cli_bind
                .or_else(|| toml.bind_address.clone())
                .unwrap_or(defaults.bind_address),
            log_level: toml.logging.level.clone(),
        }
    }
}
