//! File-based lead store.
//!
//! Each customer document is one JSON file under the base directory, named
//! by a sanitized form id. Writes go to a sibling temp file first and are
//! renamed into place, so a crashed write never leaves a half-written
//! document behind. This is the default production backend.

use super::{LeadStore, StoreError};
use crate::types::{
    CustomerDocument, CustomerProfile, EntrataIds, IntegrationSettings, Lead,
};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct FileLeadStore {
    base_dir: PathBuf,
    // Serializes read-modify-write cycles across tasks sharing this store.
    write_lock: Mutex<()>,
}

impl FileLeadStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StoreError> {
        let dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            base_dir: dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Restrict file names to a conservative character set; anything else
    /// becomes `_` so a form id can never escape the base directory.
    fn file_name(form_id: &str) -> String {
        let sanitized: String = form_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.json", sanitized)
    }

    fn document_path(&self, form_id: &str) -> PathBuf {
        self.base_dir.join(Self::file_name(form_id))
    }

    fn load(&self, form_id: &str) -> Result<Option<CustomerDocument>, StoreError> {
        let path = self.document_path(form_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, form_id: &str, document: &CustomerDocument) -> Result<(), StoreError> {
        let path = self.document_path(form_id);
        let content = serde_json::to_string_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[async_trait]
impl LeadStore for FileLeadStore {
    async fn upsert_lead(&self, form_id: &str, lead: Lead) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().expect("write lock poisoned");
        let mut document = self.load(form_id)?.unwrap_or_default();
        document.leads.insert(lead.email.clone(), lead);
        self.save(form_id, &document)
    }

    async fn attach_entrata_ids(
        &self,
        form_id: &str,
        email: &str,
        ids: EntrataIds,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().expect("write lock poisoned");
        let mut document = self
            .load(form_id)?
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))?;
        let lead = document
            .leads
            .get_mut(email)
            .ok_or_else(|| StoreError::LeadNotFound {
                form_id: form_id.to_string(),
                email: email.to_string(),
            })?;
        lead.entrata = Some(ids);
        self.save(form_id, &document)
    }

    async fn customer_profile(&self, form_id: &str) -> Result<CustomerProfile, StoreError> {
        self.load(form_id)?
            .map(|document| document.profile)
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))
    }

    async fn integrations(
        &self,
        form_id: &str,
    ) -> Result<Vec<(String, IntegrationSettings)>, StoreError> {
        let document = self
            .load(form_id)?
            .ok_or_else(|| StoreError::NotFound(form_id.to_string()))?;
        Ok(document.integrations.into_iter().collect())
    }

    async fn leads(&self, form_id: &str) -> Result<Option<Vec<Lead>>, StoreError> {
        Ok(self
            .load(form_id)?
            .map(|document| document.leads.into_values().collect()))
    }
}
