//! HTTP surface: lead intake and read-back.
//!
//! The intake handler commits its response before the integration fan-out
//! resolves; "intake accepted" and "dispatch finished" are independent
//! events by design. Anything that needs to observe dispatch completion
//! installs an observer on the dispatcher instead of reading the intake
//! response.

use crate::dispatch::IntegrationDispatcher;
use crate::outbound::HttpOutboundClient;
use crate::store::{FileLeadStore, LeadStore};
use crate::types::{Lead, LeadSubmission};
use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: String,
    /// Base URL of the backend that performs CRM pushes and sends the
    /// templated emails.
    pub backend_url: String,
    pub data_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway bind error: {0}")]
    Bind(String),
    #[error("gateway server error: {0}")]
    Serve(String),
    #[error("store init error: {0}")]
    Store(#[from] crate::store::StoreError),
}

/// Shared handler state. Dependencies are injected at construction time;
/// there is no module-level client or store.
pub struct GatewayState {
    store: Arc<dyn LeadStore>,
    dispatcher: Arc<IntegrationDispatcher>,
}

impl GatewayState {
    pub fn new(store: Arc<dyn LeadStore>, dispatcher: Arc<IntegrationDispatcher>) -> Self {
        Self { store, dispatcher }
    }
}

pub struct LeadGateway;

impl LeadGateway {
    /// Build the production wiring (file store, HTTP outbound client,
    /// default integrations) and serve until shutdown.
    pub async fn start(config: GatewayConfig) -> Result<(), GatewayError> {
        let store: Arc<dyn LeadStore> = Arc::new(FileLeadStore::new(&config.data_dir)?);
        let outbound = Arc::new(HttpOutboundClient::new(&config.backend_url));
        let dispatcher = Arc::new(IntegrationDispatcher::new(store.clone(), outbound));
        let state = Arc::new(GatewayState::new(store, dispatcher));

        let listener = TcpListener::bind(config.bind_addr.as_str())
            .await
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!("lead gateway listening on {}", config.bind_addr);
        Self::serve(listener, state).await
    }

    /// Serve a pre-built state on an already-bound listener. Tests bind an
    /// ephemeral port and pass their own wiring through here.
    pub async fn serve(listener: TcpListener, state: Arc<GatewayState>) -> Result<(), GatewayError> {
        axum::serve(listener, router(state).into_make_service())
            .await
            .map_err(|e| GatewayError::Serve(e.to_string()))
    }
}

/// Intake accepts only POST; the read-back shares the route with GET. Any
/// other method is answered 405 by the router with no side effects.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/leads", get(get_leads_handler).post(insert_lead_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn insert_lead_handler(
    State(state): State<Arc<GatewayState>>,
    Json(submission): Json<LeadSubmission>,
) -> Result<String, (StatusCode, String)> {
    info!(
        "Received new lead for form {} from {}",
        submission.form_id, submission.source
    );

    // Persist before any dispatch consideration. This also creates the
    // customer document when it is the customer's first lead.
    let lead = Lead::from_submission(&submission);
    state
        .store
        .upsert_lead(&submission.form_id, lead.clone())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!("Inserted new lead {}", lead.email);

    if submission.is_test_request {
        info!("received a test request, inserting lead but not pushing to integrations");
    } else {
        let dispatcher = state.dispatcher.clone();
        let form_id = submission.form_id.clone();
        tokio::spawn(async move {
            if let Err(err) = dispatcher.fan_out(&form_id, &lead).await {
                error!("integration fan-out for {} aborted: {}", form_id, err);
            }
        });
    }

    // The caller learns that intake was accepted, nothing more; the fan-out
    // has not resolved yet.
    Ok("Inserted new lead".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadsQuery {
    form_id: String,
}

async fn get_leads_handler(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<LeadsQuery>,
) -> Response {
    match state.store.leads(&query.form_id).await {
        Ok(Some(leads)) => (StatusCode::OK, Json(leads)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            format!("Error: no document with ID {}", query.form_id),
        )
            .into_response(),
        Err(err) => {
            error!("lead read-back for {} failed: {}", query.form_id, err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
