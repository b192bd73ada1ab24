//! Team notification email trigger.
//!
//! Fire-and-forget: the backend renders and sends the email, and nothing in
//! the response is interesting here.

use super::{DispatchError, DispatchRequest, Integration, Payload};
use crate::timefmt::format_tour_time;
use serde_json::json;

pub const KIND: &str = "email-team";

pub struct EmailTeamIntegration;

impl Integration for EmailTeamIntegration {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn backend_path(&self) -> &'static str {
        "/email/newLead"
    }

    fn build_payload(&self, request: &DispatchRequest) -> Result<Payload, DispatchError> {
        // Separate from company_info.email so a customer can route new-lead
        // notifications to a dedicated inbox.
        let team_email = request
            .settings
            .team_email
            .as_deref()
            .ok_or(DispatchError::MissingSetting {
                kind: KIND,
                field: "team_email",
            })?;
        let promo_code = request
            .promos
            .first()
            .map(|promo| promo.code.clone())
            .unwrap_or_default();

        Ok(Payload::Send(json!({
            "lColor": request.branding.gradient.l_color,
            "rColor": request.branding.gradient.r_color,
            "cmpEmails": team_email,
            "company": request.company_info.name,
            "leadName": request.lead.name,
            "code": promo_code,
            "option": request.lead.source,
            "dateTime": format_tour_time(&request.lead.created_at),
            "leadEmail": request.lead.email,
            "leadNum": request.lead.phone,
            "tourPath": request.lead.answers.join("\n"),
        })))
    }
}
