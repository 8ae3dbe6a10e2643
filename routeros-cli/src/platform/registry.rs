//! Global platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Global platform registry.
static REGISTRY: Lazy<RwLock<PlatformRegistry>> = Lazy::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions.
///
/// Definitions are stored behind an `Arc` so every driver built for a
/// platform shares the same compiled patterns.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, Arc<PlatformDefinition>>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    fn register_builtin_platforms(&mut self) {
        self.platforms.insert(
            vendors::routeros::PLATFORM_NAME.to_string(),
            Arc::new(vendors::routeros::platform()),
        );
    }

    /// Register a platform definition.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<()> {
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            }
            .into());
        }
        self.platforms.insert(platform.name.clone(), Arc::new(platform));
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<Arc<PlatformDefinition>> {
        self.platforms.get(name).cloned()
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }
}
