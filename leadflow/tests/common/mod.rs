//! Shared fixtures and doubles for the scenario tests.
#![allow(dead_code)]

use async_trait::async_trait;
use leadflow::outbound::{OutboundClient, OutboundError};
use leadflow::types::{
    Address, Branding, CustomerDocument, Gradient, IntegrationSettings, Lead, LeadSubmission,
    Promo, SocialLinks,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

enum Scripted {
    Reply(Value),
    Fail(String),
}

/// Outbound double: records every POST and answers from a per-path script.
/// Unscripted paths answer `Null`, like a backend whose response nobody
/// reads.
pub struct ScriptedOutbound {
    calls: Mutex<Vec<(String, Value)>>,
    script: Mutex<HashMap<String, Scripted>>,
}

impl ScriptedOutbound {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(HashMap::new()),
        }
    }

    pub fn reply(self, path: &str, body: Value) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(path.to_string(), Scripted::Reply(body));
        self
    }

    pub fn fail(self, path: &str, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(path.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|(path, _)| path).collect()
    }
}

#[async_trait]
impl OutboundClient for ScriptedOutbound {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, OutboundError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        match self.script.lock().unwrap().get(path) {
            Some(Scripted::Fail(message)) => Err(OutboundError::Transport {
                path: path.to_string(),
                message: message.clone(),
            }),
            Some(Scripted::Reply(body)) => Ok(body.clone()),
            None => Ok(Value::Null),
        }
    }
}

pub const FORM_ID: &str = "magnolia-lofts";

/// A fully onboarded customer document with no integrations configured;
/// tests add the integrations they exercise.
pub fn customer_document(first_promo_live: bool) -> CustomerDocument {
    let mut document = CustomerDocument::default();
    document.profile.company_info = leadflow::types::CompanyInfo {
        name: "Magnolia Lofts".to_string(),
        email: "hello@magnolia.example".to_string(),
        rep_name: "Sam Rivers".to_string(),
        website: "https://magnolia.example".to_string(),
        phone: "555-0199".to_string(),
        address: Address {
            street_address: "100 Magnolia Way".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
        },
        social: SocialLinks {
            selfie: "magnolia-selfie".to_string(),
            fb: "magnolia-fb".to_string(),
            insta: "magnolia-ig".to_string(),
            twitter: "magnolia-tw".to_string(),
        },
        reg_link: "https://magnolia.example/register".to_string(),
    };
    document.profile.branding = Branding {
        gradient: Gradient {
            l_color: "#112233".to_string(),
            r_color: "#445566".to_string(),
        },
    };
    document.profile.promos = vec![Promo {
        code: "SUMMER".to_string(),
        fee_name: "application fee".to_string(),
        value: json!(50),
        live: first_promo_live,
    }];
    document
}

pub fn entrata_settings(live: bool) -> IntegrationSettings {
    IntegrationSettings {
        live,
        username: Some("api-user".to_string()),
        password: Some("hunter2".to_string()),
        property_id: Some(json!(771234)),
        originating_source_id: Some(json!(42)),
        team_email: None,
    }
}

pub fn email_team_settings(live: bool) -> IntegrationSettings {
    IntegrationSettings {
        live,
        team_email: Some("leasing@magnolia.example".to_string()),
        ..IntegrationSettings::default()
    }
}

pub fn submission(email: &str) -> LeadSubmission {
    serde_json::from_value(json!({
        "formId": FORM_ID,
        "name": "Jane Q Public",
        "email": email,
        "phone": "555-0100",
        "leased": false,
        "source": "video-tour",
        "tourTime": "2026-08-07T09:05:00",
        "tourAnswers": ["pool", "two bedroom"],
    }))
    .expect("fixture submission")
}

pub fn lead(email: &str) -> Lead {
    Lead::from_submission(&submission(email))
}

/// The nested envelope Entrata wraps around a successful push.
pub fn entrata_success(applicant_id: Value, application_id: Value) -> Value {
    json!({
        "response": {
            "result": {
                "prospects": {
                    "prospect": [{
                        "status": "Success",
                        "applicantId": applicant_id,
                        "applicationId": application_id,
                    }]
                }
            }
        }
    })
}

pub fn entrata_failure(message: &str) -> Value {
    json!({
        "response": {
            "result": {
                "prospects": {
                    "prospect": [{
                        "status": "Failure",
                        "message": message,
                    }]
                }
            }
        }
    })
}
