use crate::domain::{
    config::{ProjectConfig, SessKitConfig},
    error::{SessKitError, SessKitResult},
};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory and file name of the project-level configuration
const PROJECT_CONFIG_DIR: &str = ".sesskit";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> SessKitResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Configuration manager with explicit locations
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files.
    ///
    /// Defaults, then the global file, then each `[manager]` field the
    /// project file sets.
    pub fn load_config(&self) -> SessKitResult<SessKitConfig> {
        let mut config = SessKitConfig::default();

        if self.global_config_path.exists() {
            config = self.load_config_from_path(&self.global_config_path)?;
        }

        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                let project_config: ProjectConfig = Self::read_toml(project_path)?;
                project_config.manager.apply_to(&mut config.manager);
            }
        }

        Ok(config)
    }

    /// Save configuration to the global file
    pub fn save_config(&self, config: &SessKitConfig) -> SessKitResult<()> {
        if let Some(parent) = self.global_config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessKitError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        self.save_config_to_path(&self.global_config_path, config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> SessKitResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SessKitError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("sesskit").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> SessKitResult<SessKitConfig> {
        Self::read_toml(path)
    }

    fn read_toml<T: DeserializeOwned>(path: &Path) -> SessKitResult<T> {
        let content = fs::read_to_string(path).map_err(|e| SessKitError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| SessKitError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &SessKitConfig) -> SessKitResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| SessKitError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SessKitError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration under `path`
    pub fn init_project_config(&self, path: &Path) -> SessKitResult<PathBuf> {
        let config_dir = path.join(PROJECT_CONFIG_DIR);
        let config_file = config_dir.join(CONFIG_FILE);

        if config_file.exists() {
            return Err(SessKitError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        fs::create_dir_all(&config_dir).map_err(|e| SessKitError::Config {
            message: format!("Failed to create {} directory: {}", PROJECT_CONFIG_DIR, e),
        })?;

        self.save_config_to_path(&config_file, &SessKitConfig::default())?;

        Ok(config_file)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_when_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_paths(temp_dir.path().join("missing.toml"), None);

        let config = manager.load_config().unwrap();
        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.manager.cookie_name, "gosessionid");
        assert_eq!(config.manager.max_lifetime, 3600);
    }

    #[test]
    fn test_project_merges_into_global_manager() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");

        fs::write(
            &global,
            "[global]\nlog_level = \"debug\"\n[manager]\ncookie_name = \"global_sid\"\n",
        )
        .unwrap();
        fs::write(&project, "[manager]\nmax_lifetime = 90\n").unwrap();

        let manager = ConfigManager::with_paths(global, Some(project));
        let config = manager.load_config().unwrap();

        assert_eq!(config.global.log_level, "debug");
        assert_eq!(config.manager.max_lifetime, 90);
        assert_eq!(config.manager.cookie_name, "global_sid");
        assert_eq!(config.manager.provider, "memory");
    }

    #[test]
    fn test_invalid_file_reports_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[manager\nmax_lifetime = ").unwrap();

        let manager = ConfigManager::with_paths(path, None);
        assert!(matches!(manager.load_config(), Err(SessKitError::Config { .. })));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_paths(path.clone(), None);

        let mut config = SessKitConfig::default();
        config.manager.cookie_name = "custom".to_string();
        manager.save_config(&config).unwrap();

        assert!(path.exists());
        assert_eq!(manager.load_config().unwrap().manager.cookie_name, "custom");
    }

    #[test]
    fn test_init_project_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_paths(temp_dir.path().join("global.toml"), None);

        let config_file = manager.init_project_config(temp_dir.path()).unwrap();
        assert_eq!(config_file, temp_dir.path().join(".sesskit").join("config.toml"));

        let content = fs::read_to_string(&config_file).unwrap();
        let config: SessKitConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.manager.provider, "memory");

        // A second init refuses to overwrite
        assert!(manager.init_project_config(temp_dir.path()).is_err());
    }
}
