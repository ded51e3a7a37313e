use serde::{Deserialize, Serialize};

/// SessKit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessKitConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Session manager configuration
    #[serde(default)]
    pub manager: ManagerConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Session manager settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Name of the cookie carrying the session identifier
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Registered provider to resolve at construction
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Idle expiry in seconds; also the cookie max-age (0 = browser-session cookie)
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime: u64,
}

impl ManagerConfig {
    pub fn new(cookie_name: &str, provider: &str, max_lifetime: u64) -> Self {
        Self {
            cookie_name: cookie_name.to_string(),
            provider: provider.to_string(),
            max_lifetime,
        }
    }
}

/// Project-level overrides; only the fields present in the file apply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub manager: PartialManagerConfig,
}

/// `[manager]` table with every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialManagerConfig {
    pub cookie_name: Option<String>,
    pub provider: Option<String>,
    pub max_lifetime: Option<u64>,
}

impl PartialManagerConfig {
    /// Overwrite the fields of `base` that are set here
    pub fn apply_to(self, base: &mut ManagerConfig) {
        if let Some(cookie_name) = self.cookie_name {
            base.cookie_name = cookie_name;
        }
        if let Some(provider) = self.provider {
            base.provider = provider;
        }
        if let Some(max_lifetime) = self.max_lifetime {
            base.max_lifetime = max_lifetime;
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_cookie_name() -> String {
    "gosessionid".to_string()
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_max_lifetime() -> u64 {
    3600
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            provider: default_provider(),
            max_lifetime: default_max_lifetime(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = SessKitConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: SessKitConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.manager, config.manager);
    }

    #[test]
    fn test_partial_manager_table() {
        let config: SessKitConfig = toml::from_str(
            r#"
            [manager]
            max_lifetime = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.manager.max_lifetime, 60);
        assert_eq!(config.manager.cookie_name, "gosessionid");
        assert_eq!(config.manager.provider, "memory");
        assert_eq!(config.global.log_level, "info");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: SessKitConfig = toml::from_str("").unwrap();
        assert_eq!(config.manager, ManagerConfig::default());
    }

    #[test]
    fn test_partial_overrides_only_present_fields() {
        let project: ProjectConfig = toml::from_str("[manager]\nprovider = \"shared\"\n").unwrap();
        let mut manager = ManagerConfig::new("app_sid", "memory", 120);

        project.manager.apply_to(&mut manager);

        assert_eq!(manager, ManagerConfig::new("app_sid", "shared", 120));
    }
}
