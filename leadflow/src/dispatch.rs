//! The integration fan-out.
//!
//! Given a persisted lead, reads the owning customer's configuration,
//! selects the live integrations, and dispatches to each one independently.
//! One integration's transport failure or rejection never blocks, delays,
//! or cancels a sibling's dispatch; every attempt resolves to a
//! [`DispatchOutcome`].

use crate::integrations::registry::live_configured;
use crate::integrations::{
    DispatchError, DispatchOutcome, DispatchRequest, IntegrationRegistry, OutcomeStatus, Payload,
};
use crate::outbound::OutboundClient;
use crate::store::LeadStore;
use crate::types::Lead;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Aggregate result of one completed fan-out. Logged, and forwarded to the
/// observer channel when one is installed; production callers of the intake
/// endpoint never see it.
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    pub run_id: String,
    pub form_id: String,
    pub email: String,
    pub outcomes: Vec<DispatchOutcome>,
}

pub struct IntegrationDispatcher {
    store: Arc<dyn LeadStore>,
    outbound: Arc<dyn OutboundClient>,
    registry: IntegrationRegistry,
    observer: Option<mpsc::UnboundedSender<FanOutReport>>,
}

impl IntegrationDispatcher {
    pub fn new(store: Arc<dyn LeadStore>, outbound: Arc<dyn OutboundClient>) -> Self {
        Self::with_registry(store, outbound, IntegrationRegistry::with_defaults())
    }

    pub fn with_registry(
        store: Arc<dyn LeadStore>,
        outbound: Arc<dyn OutboundClient>,
        registry: IntegrationRegistry,
    ) -> Self {
        Self {
            store,
            outbound,
            registry,
            observer: None,
        }
    }

    /// Install a completion observer. The fan-out runs detached from the
    /// intake response, so tests (and anything else that cares) get reports
    /// through this channel instead of a return value.
    pub fn with_observer(mut self, observer: mpsc::UnboundedSender<FanOutReport>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the full fan-out for one persisted lead.
    ///
    /// The two configuration lookups are issued concurrently, but both are
    /// complete before any payload builder runs. All live integrations'
    /// dispatches are then issued concurrently; outcome order follows the
    /// configuration's encounter order regardless of completion order.
    pub async fn fan_out(&self, form_id: &str, lead: &Lead) -> Result<FanOutReport, DispatchError> {
        let (profile, configured) = tokio::try_join!(
            self.store.customer_profile(form_id),
            self.store.integrations(form_id),
        )?;

        let live = live_configured(configured);
        info!("found {} live integrations for {}", live.len(), form_id);

        let attempts = live.into_iter().map(|(kind, settings)| {
            let request = DispatchRequest {
                form_id: form_id.to_string(),
                lead: lead.clone(),
                company_info: profile.company_info.clone(),
                branding: profile.branding.clone(),
                promos: profile.promos.clone(),
                settings,
            };
            self.dispatch_one(kind, request)
        });
        let outcomes = futures::future::join_all(attempts).await;

        let report = FanOutReport {
            run_id: Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            email: lead.email.clone(),
            outcomes,
        };
        if let Some(observer) = &self.observer {
            let _ = observer.send(report.clone());
        }
        Ok(report)
    }

    async fn dispatch_one(&self, kind: String, request: DispatchRequest) -> DispatchOutcome {
        let Some(integration) = self.registry.get(&kind) else {
            warn!("Unknown live integration: {}", kind);
            return DispatchOutcome::new(kind, OutcomeStatus::Skipped, "unknown integration");
        };
        info!("Found live integration: {}", kind);

        let body = match integration.build_payload(&request) {
            Ok(Payload::Send(body)) => body,
            Ok(Payload::Skip(reason)) => {
                warn!("{}: {}", kind, reason);
                return DispatchOutcome::new(kind, OutcomeStatus::Skipped, reason);
            }
            Err(err) => {
                warn!("{} payload build failed: {}", kind, err);
                return DispatchOutcome::new(kind, OutcomeStatus::IntegrationFailed, err.to_string());
            }
        };

        let response = match self.outbound.post_json(integration.backend_path(), &body).await {
            Ok(response) => response,
            Err(err) => {
                error!("{}", err);
                return DispatchOutcome::new(kind, OutcomeStatus::TransportFailed, err.to_string());
            }
        };

        match integration
            .handle_response(&request, &response, self.store.as_ref())
            .await
        {
            Ok(()) => DispatchOutcome::new(kind, OutcomeStatus::Delivered, "delivered"),
            Err(err) => {
                warn!("{} response handling failed: {}", kind, err);
                DispatchOutcome::new(kind, OutcomeStatus::IntegrationFailed, err.to_string())
            }
        }
    }
}
