//! Kind-keyed integration registry and live-integration selection.

use super::email_promo::EmailPromoIntegration;
use super::email_team::EmailTeamIntegration;
use super::entrata::EntrataIntegration;
use super::Integration;
use crate::types::IntegrationSettings;
use std::collections::HashMap;
use std::sync::Arc;

pub struct IntegrationRegistry {
    entries: HashMap<&'static str, Arc<dyn Integration>>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The production set: CRM push plus both email triggers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EntrataIntegration));
        registry.register(Arc::new(EmailTeamIntegration));
        registry.register(Arc::new(EmailPromoIntegration));
        registry
    }

    pub fn register(&mut self, integration: Arc<dyn Integration>) {
        self.entries.insert(integration.kind(), integration);
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn Integration>> {
        self.entries.get(kind).cloned()
    }
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter a customer's configured integrations down to the live ones,
/// preserving the store's encounter order. No kind is guaranteed to come
/// first; callers must not assume any particular processing order.
pub fn live_configured(
    configured: Vec<(String, IntegrationSettings)>,
) -> Vec<(String, IntegrationSettings)> {
    configured
        .into_iter()
        .filter(|(_, settings)| settings.live)
        .collect()
}
