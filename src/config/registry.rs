//! Descriptor validation: cache namespaces and paths must be unique across resources.

use crate::config::ResourceDescriptor;
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Every descriptor handed to the factory passes through here, so two resources
/// can never share a query-key prefix or a collection path.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    inner: RwLock<Registered>,
}

#[derive(Debug, Default)]
struct Registered {
    /// prefix -> collection path
    prefixes: HashMap<String, String>,
    paths: HashSet<String>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Registering the identical descriptor twice is allowed
    /// (a domain module may be asked for its resource more than once).
    pub fn register(&self, descriptor: &ResourceDescriptor) -> Result<(), ConfigError> {
        validate_descriptor(descriptor)?;
        let prefix = descriptor.prefix();
        let path = descriptor.collection_path();
        let mut reg = self
            .inner
            .write()
            .map_err(|_| ConfigError::Env("resource registry poisoned".into()))?;
        match reg.prefixes.get(prefix) {
            Some(existing) if existing == path => Ok(()),
            Some(_) => Err(ConfigError::DuplicatePrefix(prefix.to_string())),
            None if reg.paths.contains(path) => Err(ConfigError::DuplicatePath(path.to_string())),
            None => {
                reg.prefixes.insert(prefix.to_string(), path.to_string());
                reg.paths.insert(path.to_string());
                tracing::debug!(prefix = %prefix, path = %path, "resource registered");
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|r| r.prefixes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn validate_descriptor(descriptor: &ResourceDescriptor) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDescriptor {
        name: descriptor.prefix().to_string(),
        reason: reason.to_string(),
    };
    if descriptor.prefix().trim().is_empty() {
        return Err(invalid("cache key prefix must not be empty"));
    }
    let path = descriptor.collection_path();
    if !path.starts_with('/') || path.len() < 2 {
        return Err(invalid("base url must be an absolute path"));
    }
    let url_safe = path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
    if !url_safe || path.contains("//") {
        return Err(invalid("base url must contain only path-safe characters"));
    }
    Ok(())
}
