use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AttributeValue;

/// Composite identifier of a list entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EntryId {
    pub entry_id: String,
    #[serde(default)]
    pub list_id: Option<String>,
}

/// Membership of an object record in a named list.
///
/// `entry_values` is a separate namespace from the parent record's
/// `values`: the same slug can exist in both with unrelated meaning, so
/// the two must never be read through the same accessor.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListEntry {
    pub id: EntryId,
    pub parent_record_id: String,
    #[serde(default)]
    pub parent_object: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entry_values: HashMap<String, Vec<AttributeValue>>,
}

impl ListEntry {
    /// Returns the first instance of a list-level attribute, if any.
    pub fn first(&self, slug: &str) -> Option<&AttributeValue> {
        self.entry_values
            .get(slug)
            .and_then(|instances| instances.first())
    }
}
