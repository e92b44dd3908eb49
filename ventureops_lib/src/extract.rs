//! Attribute extraction: raw CRM instances down to flat scalars.
//!
//! The CRM stores every attribute as a list of shaped instances. These
//! helpers normalize the first (or every) instance to a [`Scalar`],
//! treating an absent slug or empty instance list as a normal "no value".
//! Present-but-falsy payloads (`0`, `""`, `false`) are values, not
//! absences.

use attio_api::types::{AttributeValue, ListEntry, Location, RawRecord};
use serde_json::Value;

/// A normalized attribute scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text rendering for display and cache keys.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Normalizes one instance. Locations have no scalar form; callers use
/// [`attr_location`] or [`attr_country_code`] for those.
fn scalar_of(instance: &AttributeValue) -> Option<Scalar> {
    match instance {
        AttributeValue::Text { value } => json_scalar(value),
        AttributeValue::Status { status } => Some(Scalar::Text(status.title.clone())),
        AttributeValue::SelectOption { option } => Some(Scalar::Text(option.title.clone())),
        AttributeValue::Reference {
            target_record_id, ..
        } => Some(Scalar::Text(target_record_id.clone())),
        AttributeValue::Domain { domain } => Some(Scalar::Text(domain.clone())),
        AttributeValue::Interaction { interacted_at, .. } => {
            Some(Scalar::Text(interacted_at.clone()))
        }
        AttributeValue::Currency { currency_value, .. } => Some(Scalar::Number(*currency_value)),
        AttributeValue::Location(_) => None,
        AttributeValue::Person { full_name, .. } => Some(Scalar::Text(full_name.clone())),
        AttributeValue::Raw(value) => json_scalar(value),
    }
}

fn json_scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::String(s) => Some(Scalar::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(Scalar::Number),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Null => None,
        // Last resort for shapes nobody recognized.
        other => Some(Scalar::Text(other.to_string())),
    }
}

/// Extracts the first instance of an object-record attribute.
pub fn attr_scalar(record: &RawRecord, slug: &str) -> Option<Scalar> {
    record.first(slug).and_then(scalar_of)
}

/// Extracts every instance of a multi-value attribute, in source order,
/// never deduplicated.
pub fn attr_scalars(record: &RawRecord, slug: &str) -> Vec<Scalar> {
    record.all(slug).iter().filter_map(scalar_of).collect()
}

pub fn attr_text(record: &RawRecord, slug: &str) -> Option<String> {
    attr_scalar(record, slug).map(|s| s.to_text())
}

pub fn attr_number(record: &RawRecord, slug: &str) -> Option<f64> {
    attr_scalar(record, slug).and_then(|s| s.as_f64())
}

pub fn attr_bool(record: &RawRecord, slug: &str) -> Option<bool> {
    attr_scalar(record, slug).and_then(|s| s.as_bool())
}

/// Dedicated accessor for location attributes.
pub fn attr_location<'a>(record: &'a RawRecord, slug: &str) -> Option<&'a Location> {
    match record.first(slug) {
        Some(AttributeValue::Location(loc)) => Some(loc),
        _ => None,
    }
}

pub fn attr_country_code(record: &RawRecord, slug: &str) -> Option<String> {
    attr_location(record, slug).and_then(|loc| loc.country_code.clone())
}

/// Extracts the first instance of a list-entry attribute. List entries are
/// a separate namespace from their parent record: the same slug can exist
/// in both with unrelated meaning.
pub fn entry_scalar(entry: &ListEntry, slug: &str) -> Option<Scalar> {
    entry.first(slug).and_then(scalar_of)
}

pub fn entry_bool(entry: &ListEntry, slug: &str) -> Option<bool> {
    entry_scalar(entry, slug).and_then(|s| s.as_bool())
}

pub fn entry_number(entry: &ListEntry, slug: &str) -> Option<f64> {
    entry_scalar(entry, slug).and_then(|s| s.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(values: Value) -> RawRecord {
        serde_json::from_value(json!({
            "id": { "record_id": "rec-1" },
            "created_at": "2024-01-01T00:00:00Z",
            "values": values
        }))
        .unwrap()
    }

    #[test]
    fn absent_attribute_is_none() {
        let rec = record(json!({}));
        assert_eq!(attr_scalar(&rec, "name"), None);
    }

    #[test]
    fn empty_instance_list_is_none() {
        let rec = record(json!({ "name": [] }));
        assert_eq!(attr_scalar(&rec, "name"), None);
    }

    #[test]
    fn plain_text_value() {
        let rec = record(json!({ "name": [{ "value": "Acme" }] }));
        assert_eq!(attr_scalar(&rec, "name"), Some(Scalar::Text("Acme".into())));
    }

    #[test]
    fn falsy_values_are_present() {
        let rec = record(json!({
            "employees": [{ "value": 0 }],
            "notes": [{ "value": "" }],
            "active": [{ "value": false }]
        }));
        assert_eq!(attr_scalar(&rec, "employees"), Some(Scalar::Number(0.0)));
        assert_eq!(attr_scalar(&rec, "notes"), Some(Scalar::Text("".into())));
        assert_eq!(attr_scalar(&rec, "active"), Some(Scalar::Bool(false)));
    }

    #[test]
    fn null_value_is_none() {
        let rec = record(json!({ "notes": [{ "value": null }] }));
        assert_eq!(attr_scalar(&rec, "notes"), None);
    }

    #[test]
    fn status_and_option_titles() {
        let rec = record(json!({
            "status": [{ "status": { "title": "Met" } }],
            "industry": [{ "option": { "title": "Climate" } }]
        }));
        assert_eq!(attr_text(&rec, "status").as_deref(), Some("Met"));
        assert_eq!(attr_text(&rec, "industry").as_deref(), Some("Climate"));
    }

    #[test]
    fn reference_domain_currency_person() {
        let rec = record(json!({
            "owner": [{ "target_object": "members", "target_record_id": "m-1" }],
            "domains": [{ "domain": "acme.io" }],
            "raised": [{ "currency_value": 6000000.0 }],
            "ceo": [{ "full_name": "Ada Lovelace" }]
        }));
        assert_eq!(attr_text(&rec, "owner").as_deref(), Some("m-1"));
        assert_eq!(attr_text(&rec, "domains").as_deref(), Some("acme.io"));
        assert_eq!(attr_number(&rec, "raised"), Some(6_000_000.0));
        assert_eq!(attr_text(&rec, "ceo").as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn location_goes_through_dedicated_accessor() {
        let rec = record(json!({
            "hq": [{ "country_code": "FR", "locality": "Paris" }]
        }));
        assert_eq!(attr_scalar(&rec, "hq"), None);
        assert_eq!(attr_country_code(&rec, "hq").as_deref(), Some("FR"));
    }

    #[test]
    fn multi_value_preserves_order_and_duplicates() {
        let rec = record(json!({
            "tags": [
                { "option": { "title": "AI" } },
                { "option": { "title": "Climate" } },
                { "option": { "title": "AI" } }
            ]
        }));
        let tags: Vec<String> = attr_scalars(&rec, "tags")
            .into_iter()
            .map(|s| s.to_text())
            .collect();
        assert_eq!(tags, vec!["AI", "Climate", "AI"]);
    }

    #[test]
    fn entry_namespace_is_separate() {
        let entry: ListEntry = serde_json::from_value(json!({
            "id": { "entry_id": "e-1" },
            "parent_record_id": "deal-1",
            "created_at": "2024-01-01T00:00:00Z",
            "entry_values": { "in_scope": [{ "value": false }] }
        }))
        .unwrap();
        assert_eq!(entry_bool(&entry, "in_scope"), Some(false));
        assert_eq!(entry_scalar(&entry, "status"), None);
    }
}
