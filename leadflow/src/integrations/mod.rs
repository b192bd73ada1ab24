//! Integration capabilities, keyed by kind.
//!
//! Each integration pairs a pure payload builder with a response policy.
//! New integrations register with the [`registry::IntegrationRegistry`]
//! instead of growing a branch in the dispatcher.

use crate::store::{LeadStore, StoreError};
use crate::types::{Branding, CompanyInfo, IntegrationSettings, Lead, Promo};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod email_promo;
pub mod email_team;
pub mod entrata;
pub mod registry;

pub use registry::IntegrationRegistry;

/// Everything one integration needs to shape and deliver a single lead.
/// Built per fan-out, never persisted.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub form_id: String,
    pub lead: Lead,
    pub company_info: CompanyInfo,
    pub branding: Branding,
    pub promos: Vec<Promo>,
    pub settings: IntegrationSettings,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("integration {kind} is missing required setting {field}")]
    MissingSetting { kind: &'static str, field: &'static str },
    #[error("{kind} rejected the lead: {message}")]
    Rejected { kind: &'static str, message: String },
    #[error("unexpected response shape from {kind}: {detail}")]
    MalformedResponse { kind: &'static str, detail: String },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// What a payload builder decided to do.
#[derive(Debug, Clone)]
pub enum Payload {
    /// POST this body to the integration's backend path.
    Send(Value),
    /// A precondition is not met; record a warning, make no call.
    Skip(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Delivered,
    TransportFailed,
    IntegrationFailed,
    Skipped,
}

/// The recorded result of one integration attempt. Observable through the
/// fan-out report; not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub kind: String,
    pub status: OutcomeStatus,
    pub detail: String,
}

impl DispatchOutcome {
    pub fn new(kind: impl Into<String>, status: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// One downstream integration: a registry key, a backend path, a pure
/// payload builder, and (optionally) a response policy.
#[async_trait]
pub trait Integration: Send + Sync {
    fn kind(&self) -> &'static str;

    fn backend_path(&self) -> &'static str;

    /// Pure transformation from lead + configuration to the integration's
    /// wire shape. No I/O happens here.
    fn build_payload(&self, request: &DispatchRequest) -> Result<Payload, DispatchError>;

    /// Applied to the raw response body, and only after this integration's
    /// own call resolved on the transport level. The default consumes
    /// nothing, which is correct for the fire-and-forget email triggers.
    async fn handle_response(
        &self,
        request: &DispatchRequest,
        body: &Value,
        store: &dyn LeadStore,
    ) -> Result<(), DispatchError> {
        let _ = (request, body, store);
        Ok(())
    }
}
