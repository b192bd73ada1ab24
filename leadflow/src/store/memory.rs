//! In-memory lead store.
//!
//! Primary backend for tests; also usable for ephemeral deployments.

use super::{LeadStore, StoreError};
use crate::types::{
    CustomerDocument, CustomerProfile, EntrataIds, IntegrationSettings, Lead,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct MemoryLeadStore {
    customers: RwLock<HashMap<String, CustomerDocument>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a full customer document, replacing any existing one. Intended
    /// for fixtures.
    pub fn seed_customer(&self, form_id: impl Into<String>, document: CustomerDocument) {
        let mut customers = self.customers.write().expect("customer map poisoned");
        customers.insert(form_id.into(), document);
    }
}

impl Default for MemoryLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn upsert_lead(&self, form_id: &str, lead: Lead) -> Result<(), StoreError> {
        let mut customers = self.customers.write().expect("customer map poisoned");
        let document = customers.entry(form_id.to_string()).or_default();
        document.leads.insert(lead.email.clone(), lead);
        Ok(())
    }

    async fn attach_entrata_ids(
        &self,
        form_id: &str,
        email: &str,
        ids: EntrataIds,
    ) -> Result<(), StoreError> {
        let mut customers = self.customers.write().expect("customer map poisoned");
        let document = customers
            .get_mut(form_id)
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))?;
        let lead = document
            .leads
            .get_mut(email)
            .ok_or_else(|| StoreError::LeadNotFound {
                form_id: form_id.to_string(),
                email: email.to_string(),
            })?;
        lead.entrata = Some(ids);
        Ok(())
    }

    async fn customer_profile(&self, form_id: &str) -> Result<CustomerProfile, StoreError> {
        let customers = self.customers.read().expect("customer map poisoned");
        customers
            .get(form_id)
            .map(|document| document.profile.clone())
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))
    }

    async fn integrations(
        &self,
        form_id: &str,
    ) -> Result<Vec<(String, IntegrationSettings)>, StoreError> {
        let customers = self.customers.read().expect("customer map poisoned");
        let document = customers
            .get(form_id)
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))?;
        Ok(document
            .integrations
            .iter()
            .map(|(kind, settings)| (kind.clone(), settings.clone()))
            .collect())
    }

    async fn leads(&self, form_id: &str) -> Result<Option<Vec<Lead>>, StoreError> {
        let customers = self.customers.read().expect("customer map poisoned");
        Ok(customers
            .get(form_id)
            .map(|document| document.leads.values().cloned().collect()))
    }
}
