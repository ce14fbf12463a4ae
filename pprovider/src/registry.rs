//! Backends keyed by [`ProviderId`], for front ends that switch at runtime.

use std::sync::Arc;

use pcommon::Registry;

use crate::{ModelProvider, ProviderError, ProviderId};

#[derive(Default)]
pub struct ProviderRegistry {
    providers: Registry<ProviderId, Arc<dyn ModelProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the provider's own id, returning any backend it displaced.
    pub fn register(&mut self, provider: Arc<dyn ModelProvider>) -> Option<Arc<dyn ModelProvider>> {
        self.providers.insert(provider.id(), provider)
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn ModelProvider>> {
        self.providers.get(&id).cloned()
    }

    /// Like [`Self::get`], failing with an `Unavailable` error when absent.
    pub fn resolve(&self, id: ProviderId) -> Result<Arc<dyn ModelProvider>, ProviderError> {
        self.get(id)
            .ok_or_else(|| ProviderError::unavailable(format!("no {id} backend is configured")))
    }

    pub fn remove(&mut self, id: ProviderId) -> Option<Arc<dyn ModelProvider>> {
        self.providers.remove(&id)
    }

    /// Registered ids in display order.
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids = self.providers.keys().copied().collect::<Vec<_>>();
        ids.sort_by_key(|id| id.as_str());
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
