use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::{BucketProvider, Provider};

/// Registry of available bucket providers.
///
/// Holds one client per cloud provider. The dispatcher looks clients up by
/// the providers selected on the command line.
///
/// # Example
///
/// ```rust
/// let mut registry = ProviderRegistry::new();
/// registry.register(S3Buckets);
///
/// let client = registry.get(Provider::Aws);
/// ```
pub struct ProviderRegistry {
    clients: HashMap<Provider, Arc<dyn BucketProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Register a bucket provider.
    ///
    /// If a client for the same provider already exists, it will be replaced.
    pub fn register<P: BucketProvider + 'static>(&mut self, client: P) {
        self.clients.insert(client.provider(), Arc::new(client));
    }

    /// Get the client for a provider.
    pub fn get(&self, provider: Provider) -> Option<Arc<dyn BucketProvider>> {
        self.clients.get(&provider).cloned()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
