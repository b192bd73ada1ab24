//! Storage trait and error types for customer documents and leads.
//!
//! Responsibilities:
//! - Define a minimal storage-agnostic API for what the intake and fan-out
//!   paths need: lead upsert, the post-CRM id merge, and the two
//!   configuration lookups.
//! - Keep interfaces small and focused for easier testing and alternate
//!   backends.

use crate::types::{CustomerProfile, EntrataIds, IntegrationSettings, Lead};
use async_trait::async_trait;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileLeadStore;
pub use memory::MemoryLeadStore;

/// Error type for lead store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no document with ID {0}")]
    NotFound(String),
    #[error("no lead {email} under document {form_id}")]
    LeadNotFound { form_id: String, email: String },
    #[error("IO error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e.to_string())
    }
}

/// Storage-agnostic access to customer documents.
///
/// Notes:
/// - Backends must be Send + Sync so a gateway and detached fan-out tasks
///   can share one behind an Arc.
/// - `upsert_lead` creates the customer document if it does not exist yet;
///   a document created this way has an empty profile until the customer is
///   onboarded, which is also how the original product behaved.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Write a lead under `form_id`, keyed by email. A repeat submission
    /// with the same email overwrites the previous record.
    async fn upsert_lead(&self, form_id: &str, lead: Lead) -> Result<(), StoreError>;

    /// Merge CRM-assigned ids into an existing lead. This is a targeted
    /// field update: every field written at intake must survive it.
    async fn attach_entrata_ids(
        &self,
        form_id: &str,
        email: &str,
        ids: EntrataIds,
    ) -> Result<(), StoreError>;

    /// Top-level customer fields (company info, branding, promos).
    async fn customer_profile(&self, form_id: &str) -> Result<CustomerProfile, StoreError>;

    /// The customer's configured integrations, in encounter order.
    async fn integrations(
        &self,
        form_id: &str,
    ) -> Result<Vec<(String, IntegrationSettings)>, StoreError>;

    /// All leads for a customer. `Ok(None)` when no such customer document
    /// exists; `Ok(Some(vec![]))` when it exists but has no leads yet.
    async fn leads(&self, form_id: &str) -> Result<Option<Vec<Lead>>, StoreError>;
}
