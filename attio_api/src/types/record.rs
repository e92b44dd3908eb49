use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AttributeValue;

/// Composite identifier of an object record.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecordId {
    pub record_id: String,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
}

/// A raw object record (company or deal) keyed by attribute slug.
///
/// Every attribute holds an ordered list of instances; single-value
/// attributes use the first. An absent slug or an empty list is a normal
/// "no value", never an error.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub values: HashMap<String, Vec<AttributeValue>>,
}

impl RawRecord {
    /// Returns the first instance of an attribute, if any.
    pub fn first(&self, slug: &str) -> Option<&AttributeValue> {
        self.values.get(slug).and_then(|instances| instances.first())
    }

    /// Returns all instances of an attribute in source order.
    pub fn all(&self, slug: &str) -> &[AttributeValue] {
        self.values.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }
}
