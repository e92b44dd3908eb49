//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use serde_json::{json, Value};

/// Trait implemented by all query builders. Provides JSON-payload
/// serialization and shared builder methods for pagination and sorting.
/// Attio queries are POSTed as a JSON body rather than URL parameters.
pub trait Query {
    /// Renders this query as the JSON payload of a `.../query` request.
    fn to_payload(&self) -> Value;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page size (records per request).
    fn with_limit(mut self, limit: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = limit;
        self
    }

    /// Sets the zero-based record offset.
    fn with_offset(mut self, offset: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().offset = offset;
        self
    }

    /// Adds a sort on the given attribute slug.
    fn with_sort(mut self, attribute: &str, direction: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().sorts.push(Sort {
            attribute: attribute.to_string(),
            direction,
        });
        self
    }
}

/// Sort order for query results.
#[derive(Clone, Copy, Default)]
pub enum SortDirection {
    /// Ascending order (oldest/smallest first).
    Asc,
    /// Descending order (newest/largest first). This is the default.
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A single sort clause.
#[derive(Clone)]
pub struct Sort {
    pub attribute: String,
    pub direction: SortDirection,
}

/// Fields shared by all query types: pagination and sorting.
#[derive(Clone)]
pub struct QueryCommon {
    /// Records per request. Defaults to 500, the API maximum.
    pub limit: i64,
    /// Zero-based record offset. Defaults to 0.
    pub offset: i64,
    /// Sort clauses, applied in order.
    pub sorts: Vec<Sort>,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            limit: 500,
            offset: 0,
            sorts: Vec::new(),
        }
    }
}

impl QueryCommon {
    /// Writes the common pagination and sort fields into a payload object.
    pub fn add_to_payload(&self, payload: &mut serde_json::Map<String, Value>) {
        payload.insert("limit".to_string(), json!(self.limit));
        payload.insert("offset".to_string(), json!(self.offset));
        if !self.sorts.is_empty() {
            let sorts: Vec<Value> = self
                .sorts
                .iter()
                .map(|s| {
                    json!({
                        "attribute": s.attribute,
                        "direction": s.direction.as_str(),
                    })
                })
                .collect();
            payload.insert("sorts".to_string(), Value::Array(sorts));
        }
    }
}
