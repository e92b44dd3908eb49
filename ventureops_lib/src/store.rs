//! Durable local stores: assessments and meeting ratings.
//!
//! Each store is one JSON file holding a nested map keyed by company id.
//! Records are created empty on first view, mutated field by field, and
//! never deleted, only overwritten. Concurrent writers are not
//! synchronized; last write wins.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::assessment::{AssessmentData, FieldValue};
use crate::error::VentureOpsError;

fn read_json<T: serde::de::DeserializeOwned + Default>(path: &PathBuf) -> T {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return T::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("store file {} unreadable, starting empty: {}", path.display(), e);
        T::default()
    })
}

fn write_json<T: serde::Serialize>(path: &PathBuf, data: &T) -> Result<(), VentureOpsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| VentureOpsError::Cache(format!("store dir: {}", e)))?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).map_err(|e| VentureOpsError::Cache(format!("store write: {}", e)))
}

/// Assessment data for every company, one JSON file.
pub struct AssessmentStore {
    path: PathBuf,
}

impl AssessmentStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The assessment for one company; empty on first view.
    pub fn load(&self, company_id: &str) -> AssessmentData {
        let all: HashMap<String, AssessmentData> = read_json(&self.path);
        all.get(company_id).cloned().unwrap_or_default()
    }

    pub fn load_all(&self) -> HashMap<String, AssessmentData> {
        read_json(&self.path)
    }

    /// Overwrites one field of one theme.
    pub fn set_field(
        &self,
        company_id: &str,
        theme_id: &str,
        field_id: &str,
        value: FieldValue,
    ) -> Result<(), VentureOpsError> {
        let mut all: HashMap<String, AssessmentData> = read_json(&self.path);
        all.entry(company_id.to_string())
            .or_default()
            .entry(theme_id.to_string())
            .or_default()
            .insert(field_id.to_string(), value);
        write_json(&self.path, &all)
    }
}

/// Per-meeting 1–10 ratings for every company, one JSON file.
pub struct MeetingRatingStore {
    path: PathBuf,
}

impl MeetingRatingStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn ratings(&self, company_id: &str) -> HashMap<String, u8> {
        let all: HashMap<String, HashMap<String, u8>> = read_json(&self.path);
        all.get(company_id).cloned().unwrap_or_default()
    }

    pub fn set_rating(
        &self,
        company_id: &str,
        meeting_id: &str,
        rating: u8,
    ) -> Result<(), VentureOpsError> {
        let mut all: HashMap<String, HashMap<String, u8>> = read_json(&self.path);
        all.entry(company_id.to_string())
            .or_default()
            .insert(meeting_id.to_string(), rating);
        write_json(&self.path, &all)
    }
}
