use serde_json::{json, Value};

/// One filter clause on an attribute slug.
///
/// Clauses on distinct slugs combine as an implicit AND when merged into
/// the query's `filter` object.
#[derive(Clone)]
pub enum Filter {
    /// Exact equality on a scalar value.
    Eq(String, Value),
    /// Membership in a value set (`$in`).
    In(String, Vec<Value>),
    /// Substring match (`$contains`).
    Contains(String, String),
}

impl Filter {
    pub fn slug(&self) -> &str {
        match self {
            Filter::Eq(slug, _) | Filter::Contains(slug, _) => slug,
            Filter::In(slug, _) => slug,
        }
    }

    /// Renders the operator object for this clause.
    pub fn to_value(&self) -> Value {
        match self {
            Filter::Eq(_, value) => json!({ "$eq": value }),
            Filter::In(_, values) => json!({ "$in": values }),
            Filter::Contains(_, needle) => json!({ "$contains": needle }),
        }
    }
}
