//! Entrata CRM push.
//!
//! The only integration whose outcome mutates stored state: a successful
//! push returns applicant/application ids that are merged back into the
//! lead record. Entrata embeds success or failure inside a nested envelope
//! in an otherwise ordinary 200 response, so the response policy here does
//! all the status parsing the transport layer deliberately skips.

use super::{DispatchError, DispatchRequest, Integration, Payload};
use crate::store::LeadStore;
use crate::types::EntrataIds;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

pub const KIND: &str = "entrata";

pub struct EntrataIntegration;

/// Split a display name at the first space. A name with no space is all
/// first name; the last name is left empty.
fn split_name(name: &str) -> (&str, &str) {
    match name.split_once(' ') {
        Some((first, last)) => (first, last),
        None => (name, ""),
    }
}

#[derive(Debug, Deserialize)]
struct ProspectEnvelope {
    response: ProspectResponse,
}

#[derive(Debug, Deserialize)]
struct ProspectResponse {
    result: ProspectResult,
}

#[derive(Debug, Deserialize)]
struct ProspectResult {
    prospects: Prospects,
}

#[derive(Debug, Deserialize)]
struct Prospects {
    prospect: Vec<Prospect>,
}

#[derive(Debug, Deserialize)]
struct Prospect {
    #[serde(default)]
    status: String,
    #[serde(default, rename = "applicantId")]
    applicant_id: Value,
    #[serde(default, rename = "applicationId")]
    application_id: Value,
    #[serde(default)]
    message: String,
}

impl EntrataIntegration {
    fn required<'a>(
        value: Option<&'a Value>,
        field: &'static str,
    ) -> Result<&'a Value, DispatchError> {
        value.ok_or(DispatchError::MissingSetting { kind: KIND, field })
    }
}

#[async_trait]
impl Integration for EntrataIntegration {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn backend_path(&self) -> &'static str {
        "/integrations/entrata/sendLeads"
    }

    fn build_payload(&self, request: &DispatchRequest) -> Result<Payload, DispatchError> {
        let settings = &request.settings;
        let username = settings
            .username
            .as_deref()
            .ok_or(DispatchError::MissingSetting {
                kind: KIND,
                field: "username",
            })?;
        let password = settings
            .password
            .as_deref()
            .ok_or(DispatchError::MissingSetting {
                kind: KIND,
                field: "password",
            })?;
        let property_id = Self::required(settings.property_id.as_ref(), "property_id")?;
        let originating_source_id = Self::required(
            settings.originating_source_id.as_ref(),
            "originating_source_id",
        )?;

        let (first_name, last_name) = split_name(&request.lead.name);

        Ok(Payload::Send(json!({
            "creds": {
                "username": username,
                "password": password,
            },
            "property_id": property_id,
            "originating_source_id": originating_source_id,
            "first_name": first_name,
            "last_name": last_name,
            "email": request.lead.email,
            "phone": request.lead.phone,
            "video_journey": request.lead.answers.join("\n"),
            "notes": "",
        })))
    }

    async fn handle_response(
        &self,
        request: &DispatchRequest,
        body: &Value,
        store: &dyn LeadStore,
    ) -> Result<(), DispatchError> {
        let envelope: ProspectEnvelope =
            serde_json::from_value(body.clone()).map_err(|e| DispatchError::MalformedResponse {
                kind: KIND,
                detail: e.to_string(),
            })?;
        let prospect = envelope
            .response
            .result
            .prospects
            .prospect
            .into_iter()
            .next()
            .ok_or_else(|| DispatchError::MalformedResponse {
                kind: KIND,
                detail: "empty prospect list".to_string(),
            })?;

        if prospect.status != "Success" {
            return Err(DispatchError::Rejected {
                kind: KIND,
                message: prospect.message,
            });
        }

        info!(
            "Entrata accepted lead {}; applicant ID {} application ID {}",
            request.lead.email, prospect.applicant_id, prospect.application_id
        );
        store
            .attach_entrata_ids(
                &request.form_id,
                &request.lead.email,
                EntrataIds {
                    applicant_id: prospect.applicant_id,
                    application_id: prospect.application_id,
                },
            )
            .await?;
        Ok(())
    }
}
