//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from an optional TOML file. The root folder
//! (which holds the SQLite database) is resolved in priority order:
//! 1. Command-line argument
//! 2. `ANKETA_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML file
//! 4. OS-dependent default

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{CatalogSet, MAX_OTHER_SLOTS};
use crate::export::ExportOptions;
use crate::projection::OtherLabel;
use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "ANKETA_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "anketa.db";

const APP_DIR: &str = "anketa";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Export and normalization knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// "Other" slots per catalog, clamped to 1..=4
    #[serde(default = "default_other_slots")]
    pub other_slots: usize,

    #[serde(default)]
    pub other_label: OtherLabel,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            other_slots: default_other_slots(),
            other_label: OtherLabel::default(),
        }
    }
}

impl ExportConfig {
    /// Built-in catalogs with the configured "other" capacity
    pub fn catalogs(&self) -> CatalogSet {
        if self.other_slots == 0 || self.other_slots > MAX_OTHER_SLOTS {
            warn!(
                "export.other_slots = {} out of range, clamping to 1..={}",
                self.other_slots, MAX_OTHER_SLOTS
            );
        }
        CatalogSet::builtin().with_other_slots(self.other_slots)
    }

    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            catalogs: self.catalogs(),
            other_label: self.other_label,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5740
}

fn default_other_slots() -> usize {
    MAX_OTHER_SLOTS
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load `path` (or the platform config file when `None`).
    ///
    /// A missing file means defaults; an unreadable or invalid one is logged
    /// and also falls back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(config_file_path) {
            Some(path) => path,
            None => {
                info!("No config file found, using defaults");
                return Self::default();
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }
}

/// Platform config file, if one exists
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder by priority (CLI, environment, TOML, default)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/anketa
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/var/lib/anketa"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/anketa"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\anketa"))
    } else {
        PathBuf::from("./anketa_data")
    }
}

/// Root folder holding the database
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the folder if missing
    pub fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)?;
            info!("Created root folder: {}", self.path.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.path.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.bind_address(), "127.0.0.1:5740");
        assert_eq!(config.export.other_slots, 4);
        assert_eq!(config.export.other_label, OtherLabel::Generic);
    }

    #[test]
    fn test_partial_file() {
        let config: TomlConfig = toml::from_str(
            r#"
            root_folder = "/srv/anketa"

            [server]
            port = 8080

            [export]
            other_slots = 2
            other_label = "free_text"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/anketa")));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.export.other_label, OtherLabel::FreeText);
        assert_eq!(config.export.catalogs().seeds.other_slots(), 2);
    }

    #[test]
    fn test_other_slots_clamped() {
        let export = ExportConfig {
            other_slots: 9,
            ..ExportConfig::default()
        };
        assert_eq!(export.catalogs().seedlings.other_slots(), MAX_OTHER_SLOTS);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = [not toml").unwrap();

        assert!(matches!(TomlConfig::load(file.path()), Err(Error::Config(_))));
        assert_eq!(TomlConfig::load_or_default(Some(file.path())), TomlConfig::default());
    }

    #[test]
    #[serial]
    fn test_cli_beats_env() {
        std::env::set_var(ROOT_FOLDER_ENV, "/from/env");
        let config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..TomlConfig::default()
        };

        assert_eq!(
            resolve_root_folder(Some(Path::new("/from/cli")), &config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));
        std::env::remove_var(ROOT_FOLDER_ENV);
    }

    #[test]
    #[serial]
    fn test_toml_beats_default() {
        std::env::remove_var(ROOT_FOLDER_ENV);
        let config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..TomlConfig::default()
        };
        assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));
        assert_eq!(resolve_root_folder(None, &TomlConfig::default()), default_root_folder());
    }

    #[test]
    fn test_root_folder_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootFolder::new(dir.path().join("nested"));
        root.ensure_exists().unwrap();
        assert!(root.path().is_dir());
        assert_eq!(root.database_path(), dir.path().join("nested").join(DATABASE_FILE));
    }
}
