//! Data model: inbound submissions, stored leads, and the per-customer
//! configuration document the fan-out reads.
//!
//! Two serde conventions coexist on purpose: the intake endpoint speaks
//! camelCase (what the embed widget posts), while the stored customer
//! document uses snake_case fields. `regLink` is the one camelCase field
//! inside the stored document; the rename preserves it as-is.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One form submission as posted by the embed widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub form_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub leased: bool,
    pub source: String,
    pub tour_time: String,
    pub tour_answers: Vec<String>,
    #[serde(default)]
    pub is_test_request: bool,
}

/// Identifiers assigned by the Entrata CRM after a successful push.
///
/// The CRM is not consistent about returning these as strings or numbers,
/// so they are stored exactly as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrataIds {
    pub applicant_id: serde_json::Value,
    pub application_id: serde_json::Value,
}

/// A captured lead, keyed by email within its customer's lead collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub answers: Vec<String>,
    /// The raw tour-time string from the submission, kept unnormalized.
    pub created_at: String,
    pub email: String,
    pub leased: bool,
    pub name: String,
    pub phone: String,
    pub source: String,
    pub updated_at: DateTime<Utc>,
    /// Present only after a successful CRM push.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrata: Option<EntrataIds>,
}

impl Lead {
    pub fn from_submission(submission: &LeadSubmission) -> Self {
        Self {
            answers: submission.tour_answers.clone(),
            created_at: submission.tour_time.clone(),
            email: submission.email.clone(),
            leased: submission.leased,
            name: submission.name.clone(),
            phone: submission.phone.clone(),
            source: submission.source.clone(),
            updated_at: Utc::now(),
            entrata: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// Single-line rendering used by templated emails.
    pub fn single_line(&self) -> String {
        format!(
            "{}, {} {} {}",
            self.street_address, self.city, self.state, self.zip
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub selfie: String,
    pub fb: String,
    pub insta: String,
    pub twitter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub email: String,
    pub rep_name: String,
    pub website: String,
    pub phone: String,
    pub address: Address,
    pub social: SocialLinks,
    #[serde(rename = "regLink")]
    pub reg_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gradient {
    pub l_color: String,
    pub r_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub gradient: Gradient,
}

/// A promo code offer. Only the first entry of a customer's promo list is
/// consumed by the integrations today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Promo {
    pub code: String,
    pub fee_name: String,
    /// Stored as either a number or a string depending on the customer doc.
    pub value: serde_json::Value,
    pub live: bool,
}

impl Promo {
    /// Dollar rendering for emails, e.g. `$250`.
    pub fn display_amount(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => format!("${}", s),
            other => format!("${}", other),
        }
    }
}

/// Per-integration settings under a customer's `integrations` map.
///
/// The settings document is schemaless on the customer side; each
/// integration picks out the fields it needs and rejects the dispatch if a
/// required one is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    pub live: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originating_source_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_email: Option<String>,
}

/// Top-level customer fields, read in one lookup before a fan-out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerProfile {
    pub company_info: CompanyInfo,
    pub branding: Branding,
    pub promos: Vec<Promo>,
}

/// The full customer document as the stores hold it: profile fields at the
/// top level plus the `integrations` and `leads` collections. Both maps are
/// insertion-ordered so a fixed configuration enumerates deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDocument {
    #[serde(flatten)]
    pub profile: CustomerProfile,
    pub integrations: IndexMap<String, IntegrationSettings>,
    pub leads: IndexMap<String, Lead>,
}
