//! Fan-out scenarios: live-integration selection, per-integration response
//! policies, and failure isolation.

mod common;

use common::*;
use leadflow::integrations::{DispatchError, OutcomeStatus};
use leadflow::store::{LeadStore, MemoryLeadStore, StoreError};
use leadflow::IntegrationDispatcher;
use serde_json::json;
use std::sync::Arc;

fn dispatcher(
    store: Arc<MemoryLeadStore>,
    outbound: Arc<ScriptedOutbound>,
) -> IntegrationDispatcher {
    IntegrationDispatcher::new(store, outbound)
}

#[tokio::test]
async fn delivers_to_every_live_integration_and_merges_crm_ids() {
    let mut document = customer_document(true);
    document
        .integrations
        .insert("entrata".to_string(), entrata_settings(true));
    document
        .integrations
        .insert("email-team".to_string(), email_team_settings(true));

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(
        ScriptedOutbound::new().reply(
            "/integrations/entrata/sendLeads",
            entrata_success(json!("A-100"), json!("APP-200")),
        ),
    );
    let report = dispatcher(store.clone(), outbound.clone())
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    // Outcome order follows the configuration's encounter order.
    let kinds: Vec<&str> = report.outcomes.iter().map(|o| o.kind.as_str()).collect();
    assert_eq!(kinds, vec!["entrata", "email-team"]);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::Delivered));
    assert_eq!(
        outbound.called_paths(),
        vec![
            "/integrations/entrata/sendLeads".to_string(),
            "/email/newLead".to_string(),
        ]
    );

    // The CRM ids land on the stored lead, exactly as returned.
    let leads = store.leads(FORM_ID).await.unwrap().unwrap();
    let ids = leads[0].entrata.as_ref().expect("entrata ids merged");
    assert_eq!(ids.applicant_id, json!("A-100"));
    assert_eq!(ids.application_id, json!("APP-200"));
    // And the intake-written fields survived the merge.
    assert_eq!(leads[0].answers, vec!["pool", "two bedroom"]);
}

#[tokio::test]
async fn crm_rejection_is_recorded_without_touching_the_lead() {
    let mut document = customer_document(true);
    document
        .integrations
        .insert("entrata".to_string(), entrata_settings(true));

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(ScriptedOutbound::new().reply(
        "/integrations/entrata/sendLeads",
        entrata_failure("duplicate prospect"),
    ));
    let report = dispatcher(store.clone(), outbound)
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].status, OutcomeStatus::IntegrationFailed);
    assert!(report.outcomes[0].detail.contains("duplicate prospect"));

    let leads = store.leads(FORM_ID).await.unwrap().unwrap();
    assert!(leads[0].entrata.is_none());
}

#[tokio::test]
async fn transport_failure_on_one_integration_never_blocks_a_sibling() {
    let mut document = customer_document(true);
    document
        .integrations
        .insert("entrata".to_string(), entrata_settings(true));
    document
        .integrations
        .insert("email-team".to_string(), email_team_settings(true));

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(
        ScriptedOutbound::new().fail("/integrations/entrata/sendLeads", "connection refused"),
    );
    let report = dispatcher(store, outbound.clone())
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    let entrata = report
        .outcomes
        .iter()
        .find(|o| o.kind == "entrata")
        .unwrap();
    assert_eq!(entrata.status, OutcomeStatus::TransportFailed);

    let email = report
        .outcomes
        .iter()
        .find(|o| o.kind == "email-team")
        .unwrap();
    assert_eq!(email.status, OutcomeStatus::Delivered);
    assert!(outbound
        .called_paths()
        .contains(&"/email/newLead".to_string()));
}

#[tokio::test]
async fn dead_first_promo_skips_the_promo_email_without_a_call() {
    let mut document = customer_document(false);
    document.integrations.insert(
        "email-lead-promo".to_string(),
        leadflow::types::IntegrationSettings {
            live: true,
            ..Default::default()
        },
    );

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(ScriptedOutbound::new());
    let report = dispatcher(store, outbound.clone())
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    assert_eq!(report.outcomes[0].status, OutcomeStatus::Skipped);
    assert!(outbound.calls().is_empty());
}

#[tokio::test]
async fn unknown_integration_kinds_are_skipped_with_a_warning_outcome() {
    let mut document = customer_document(true);
    document.integrations.insert(
        "salesforce".to_string(),
        leadflow::types::IntegrationSettings {
            live: true,
            ..Default::default()
        },
    );

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(ScriptedOutbound::new());
    let report = dispatcher(store, outbound.clone())
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].kind, "salesforce");
    assert_eq!(report.outcomes[0].status, OutcomeStatus::Skipped);
    assert!(outbound.calls().is_empty());
}

#[tokio::test]
async fn integrations_that_are_not_live_are_not_dispatched() {
    let mut document = customer_document(true);
    document
        .integrations
        .insert("entrata".to_string(), entrata_settings(false));
    document
        .integrations
        .insert("email-team".to_string(), email_team_settings(true));

    let store = Arc::new(MemoryLeadStore::new());
    store.seed_customer(FORM_ID, document);
    let lead = lead("jane@example.com");
    store.upsert_lead(FORM_ID, lead.clone()).await.unwrap();

    let outbound = Arc::new(ScriptedOutbound::new());
    let report = dispatcher(store, outbound.clone())
        .fan_out(FORM_ID, &lead)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].kind, "email-team");
    assert_eq!(
        outbound.called_paths(),
        vec!["/email/newLead".to_string()]
    );
}

#[tokio::test]
async fn unknown_customer_aborts_with_a_structured_store_error() {
    let store = Arc::new(MemoryLeadStore::new());
    let outbound = Arc::new(ScriptedOutbound::new());
    let lead = lead("jane@example.com");

    let err = dispatcher(store, outbound)
        .fan_out("no-such-form", &lead)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Store(StoreError::NotFound(_))
    ));
}
