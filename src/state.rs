//! Shared data-layer state: transport, query cache and registered resources.

use crate::cache::QueryCache;
use crate::config::{ClientConfig, ResourceDescriptor, ResourceRegistry};
use crate::error::{ClientError, ConfigError};
use crate::service::Resource;
use crate::transport::{HttpTransport, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Cheap to clone; every clone shares the same cache and transport.
#[derive(Clone)]
pub struct DataContext {
    pub transport: Arc<dyn Transport>,
    pub cache: QueryCache,
    pub config: Arc<ClientConfig>,
    registry: Arc<ResourceRegistry>,
}

impl DataContext {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: QueryCache::new(config.stale_time, config.cache_time),
            config: Arc::new(config),
            registry: Arc::new(ResourceRegistry::new()),
        }
    }

    /// Context over the reqwest transport, configured from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        let config = ClientConfig::from_env()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// The data-layer factory: build the typed operations for one resource.
    pub fn resource<T: DeserializeOwned>(
        &self,
        descriptor: ResourceDescriptor,
    ) -> Result<Resource<T>, ConfigError> {
        self.registry.register(&descriptor)?;
        Ok(Resource::new(self.clone(), descriptor))
    }

    pub fn registered_resources(&self) -> usize {
        self.registry.len()
    }
}
