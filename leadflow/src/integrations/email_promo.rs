//! Promo email trigger for the lead.
//!
//! Sends only when the customer's first promo code is itself live; a live
//! integration with a dead promo is a configuration warning, not a call.

use super::{DispatchError, DispatchRequest, Integration, Payload};
use serde_json::json;

pub const KIND: &str = "email-lead-promo";

pub struct EmailPromoIntegration;

impl Integration for EmailPromoIntegration {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn backend_path(&self) -> &'static str {
        "/email/promo"
    }

    fn build_payload(&self, request: &DispatchRequest) -> Result<Payload, DispatchError> {
        // Only one promo code for now.
        let Some(promo) = request.promos.first() else {
            return Ok(Payload::Skip(
                "integration is live, but the customer has no promo codes".to_string(),
            ));
        };
        if !promo.live {
            return Ok(Payload::Skip(
                "integration is live, but the first promo code is not".to_string(),
            ));
        }

        let company = &request.company_info;
        Ok(Payload::Send(json!({
            "lColor": request.branding.gradient.l_color,
            "rColor": request.branding.gradient.r_color,
            "leadEmail": request.lead.email,
            "leadName": request.lead.name,
            "company": company.name,
            "cmpEmails": company.email,
            "cmpRep": company.rep_name,
            "cmpSite": company.website,
            "cmpNum": company.phone,
            "cmpAddy": company.address.single_line(),
            "fee": promo.fee_name,
            "code": promo.code,
            "amount": promo.display_amount(),
            "selfie": company.social.selfie,
            "fb": company.social.fb,
            "insta": company.social.insta,
            "twitter": company.social.twitter,
            "regLink": company.reg_link,
        })))
    }
}
