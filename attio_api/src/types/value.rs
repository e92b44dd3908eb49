use serde::{Deserialize, Deserializer, Serialize};

/// One attribute instance as returned by the CRM.
///
/// Attio stores every attribute as a list of instances, and the instance
/// shape depends on the attribute type. Modeling the shapes as an untagged
/// union keeps extraction a single exhaustive match instead of key probing.
/// Variant order matters: serde tries them top to bottom, and only `Raw`
/// accepts arbitrary JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Plain scalar payload (`text`, `number`, `checkbox`, `date`, ...).
    /// The inner value may legitimately be `0`, `""`, or `false`.
    Text {
        value: serde_json::Value,
    },
    /// Pipeline status, e.g. `{"status": {"title": "Met"}}`.
    Status {
        status: StatusOption,
    },
    /// Select option, e.g. `{"option": {"title": "Climate"}}`.
    SelectOption {
        option: StatusOption,
    },
    /// Reference to a record in another object.
    Reference {
        target_object: String,
        target_record_id: String,
    },
    /// Company domain.
    Domain {
        domain: String,
    },
    /// Auto-tracked interaction (first/last email, first/last meeting).
    Interaction {
        interaction_type: String,
        interacted_at: String,
    },
    /// Monetary amount in the base currency unit.
    Currency {
        currency_value: f64,
        #[serde(default)]
        currency_code: Option<String>,
    },
    /// Postal location. `country_code` is always present on the wire
    /// (possibly null), which is what distinguishes this shape.
    Location(Location),
    /// Person name.
    Person {
        full_name: String,
        #[serde(default)]
        first_name: Option<String>,
        #[serde(default)]
        last_name: Option<String>,
    },
    /// Unrecognized shape, preserved as-is.
    Raw(serde_json::Value),
}

/// Title-carrying option used by both status and select attributes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusOption {
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Location {
    // deserialize_with makes the key required, so an arbitrary object
    // cannot satisfy this variant by omission.
    #[serde(deserialize_with = "nullable_string")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub line_1: Option<String>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}
