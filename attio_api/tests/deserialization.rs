use attio_api::types::{AttributeValue, ListEntry, Page, RawRecord};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_companies_full() {
    let json = load_fixture("companies.json");
    let page: Page<RawRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(page.data.len(), 2);
    assert!(page.next_page_offset.is_none());

    let acme = &page.data[0];
    assert_eq!(acme.id.record_id, "rec-acme");
    assert_eq!(acme.id.object_id.as_deref(), Some("companies"));

    match acme.first("name") {
        Some(AttributeValue::Text { value }) => assert_eq!(value.as_str(), Some("Acme Robotics")),
        other => panic!("expected text value, got {:?}", other),
    }
    match acme.first("status") {
        Some(AttributeValue::Status { status }) => assert_eq!(status.title, "Met"),
        other => panic!("expected status value, got {:?}", other),
    }
    match acme.first("domains") {
        Some(AttributeValue::Domain { domain }) => assert_eq!(domain, "acme.io"),
        other => panic!("expected domain value, got {:?}", other),
    }
    match acme.first("primary_location") {
        Some(AttributeValue::Location(loc)) => {
            assert_eq!(loc.country_code.as_deref(), Some("FR"));
            assert_eq!(loc.locality.as_deref(), Some("Paris"));
        }
        other => panic!("expected location value, got {:?}", other),
    }
    match acme.first("funding_raised") {
        Some(AttributeValue::Currency { currency_value, .. }) => {
            assert_eq!(*currency_value, 6_000_000.0)
        }
        other => panic!("expected currency value, got {:?}", other),
    }
    match acme.first("ceo") {
        Some(AttributeValue::Person { full_name, .. }) => assert_eq!(full_name, "Ada Lovelace"),
        other => panic!("expected person value, got {:?}", other),
    }
    match acme.first("first_email_interaction") {
        Some(AttributeValue::Interaction { interacted_at, .. }) => {
            assert_eq!(interacted_at, "2023-05-02T10:00:00Z")
        }
        other => panic!("expected interaction value, got {:?}", other),
    }
    match acme.first("owner") {
        Some(AttributeValue::Reference {
            target_record_id, ..
        }) => assert_eq!(target_record_id, "member-7"),
        other => panic!("expected reference value, got {:?}", other),
    }

    // Present-but-falsy payloads stay Text, they must not collapse to Raw.
    match acme.first("employee_count") {
        Some(AttributeValue::Text { value }) => assert_eq!(value.as_i64(), Some(0)),
        other => panic!("expected text value, got {:?}", other),
    }
    match acme.first("notes") {
        Some(AttributeValue::Text { value }) => assert_eq!(value.as_str(), Some("")),
        other => panic!("expected text value, got {:?}", other),
    }

    assert_eq!(acme.all("industry").len(), 2);
}

#[test]
fn deserialize_company_with_no_values() {
    let json = load_fixture("companies.json");
    let page: Page<RawRecord> = serde_json::from_str(&json).unwrap();
    let empty = &page.data[1];
    assert!(empty.values.is_empty());
    assert!(empty.first("name").is_none());
    assert!(empty.all("industry").is_empty());
}

#[test]
fn deserialize_list_entries() {
    let json = load_fixture("entries.json");
    let page: Page<ListEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(page.data.len(), 1);

    let entry = &page.data[0];
    assert_eq!(entry.id.entry_id, "entry-1");
    assert_eq!(entry.parent_record_id, "deal-1");
    match entry.first("in_scope") {
        Some(AttributeValue::Text { value }) => assert_eq!(value.as_bool(), Some(false)),
        other => panic!("expected text value, got {:?}", other),
    }
}

#[test]
fn unknown_shape_preserved_as_raw() {
    let json = r#"{ "mystery_field": 42, "nested": { "a": 1 } }"#;
    let value: AttributeValue = serde_json::from_str(json).unwrap();
    match value {
        AttributeValue::Raw(raw) => assert_eq!(raw["mystery_field"], 42),
        other => panic!("expected raw value, got {:?}", other),
    }
}
