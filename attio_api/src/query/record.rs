use serde_json::Value;

use super::common::{Query, QueryCommon};
use super::filter::Filter;

/// Query builder for object-record and list-entry `.../query` endpoints.
/// Both endpoints accept the same payload shape.
#[derive(Clone, Default)]
pub struct RecordQuery {
    pub common: QueryCommon,
    pub filters: Vec<Filter>,
}

impl RecordQuery {
    /// Adds an equality filter.
    pub fn with_eq(mut self, slug: &str, value: Value) -> Self {
        self.filters.push(Filter::Eq(slug.to_string(), value));
        self
    }

    /// Adds a `$in` filter.
    pub fn with_in(mut self, slug: &str, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In(slug.to_string(), values));
        self
    }

    /// Adds a `$contains` filter.
    pub fn with_contains(mut self, slug: &str, needle: &str) -> Self {
        self.filters
            .push(Filter::Contains(slug.to_string(), needle.to_string()));
        self
    }
}

impl Query for RecordQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_payload(&self) -> Value {
        let mut payload = serde_json::Map::new();
        self.common.add_to_payload(&mut payload);
        if !self.filters.is_empty() {
            let mut filter = serde_json::Map::new();
            for clause in &self.filters {
                filter.insert(clause.slug().to_string(), clause.to_value());
            }
            payload.insert("filter".to_string(), Value::Object(filter));
        }
        Value::Object(payload)
    }
}
