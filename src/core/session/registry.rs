use crate::core::session::provider::Provider;
use crate::domain::error::{SessKitError, SessKitResult};
use crate::infrastructure::memory::MemoryProvider;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Name the reference in-memory provider is registered under
pub const MEMORY_PROVIDER: &str = "memory";

/// Catalog of storage backends by name.
///
/// Built once at startup and then shared (usually behind an `Arc`) with every
/// manager; registration needs `&mut self`, so a shared registry is frozen.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the in-memory provider under [`MEMORY_PROVIDER`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.providers.insert(
            MEMORY_PROVIDER.to_string(),
            Arc::new(MemoryProvider::new()) as Arc<dyn Provider>,
        );
        registry
    }

    /// Register `provider` under `name`. Names are write-once.
    pub fn register(&mut self, name: &str, provider: Arc<dyn Provider>) -> SessKitResult<()> {
        if name.trim().is_empty() {
            return Err(SessKitError::Configuration(
                "provider name must not be empty".to_string(),
            ));
        }

        if self.providers.contains_key(name) {
            return Err(SessKitError::Configuration(format!(
                "provider '{}' is already registered",
                name
            )));
        }

        self.providers.insert(name.to_string(), provider);
        info!("Registered session provider '{}'", name);
        Ok(())
    }

    /// Look up a registered provider
    pub fn resolve(&self, name: &str) -> SessKitResult<Arc<dyn Provider>> {
        debug!("Resolving session provider '{}'", name);
        self.providers.get(name).cloned().ok_or_else(|| {
            SessKitError::Configuration(format!(
                "unknown provider '{}' (registered: {})",
                name,
                self.names().join(", ")
            ))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_contain_memory() {
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.contains(MEMORY_PROVIDER));
        assert!(registry.resolve(MEMORY_PROVIDER).is_ok());
        assert_eq!(registry.names(), vec!["memory".to_string()]);
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());

        let provider: Arc<dyn Provider> = Arc::new(MemoryProvider::new());
        registry.register("primary", Arc::clone(&provider)).unwrap();

        let resolved = registry.resolve("primary").unwrap();
        assert!(Arc::ptr_eq(&resolved, &provider));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_keeps_original() {
        let mut registry = ProviderRegistry::new();
        let first: Arc<dyn Provider> = Arc::new(MemoryProvider::new());
        let second: Arc<dyn Provider> = Arc::new(MemoryProvider::new());

        registry.register("memory", Arc::clone(&first)).unwrap();
        let result = registry.register("memory", second);
        assert!(matches!(result, Err(SessKitError::Configuration(_))));

        let resolved = registry.resolve("memory").unwrap();
        assert!(Arc::ptr_eq(&resolved, &first));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ProviderRegistry::new();
        let result = registry.register("  ", Arc::new(MemoryProvider::new()));
        assert!(matches!(result, Err(SessKitError::Configuration(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry.resolve("redis").err().unwrap();
        assert!(matches!(err, SessKitError::Configuration(_)));
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ProviderRegistry::with_defaults();
        registry.register("file", Arc::new(MemoryProvider::new())).unwrap();
        registry.register("database", Arc::new(MemoryProvider::new())).unwrap();
        assert_eq!(registry.names(), vec!["database", "file", "memory"]);
    }
}
