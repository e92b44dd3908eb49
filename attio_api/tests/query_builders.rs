use attio_api::{Query, RecordQuery, SortDirection};
use serde_json::json;

#[test]
fn record_query_defaults() {
    let payload = RecordQuery::default().to_payload();
    assert_eq!(payload["limit"], 500);
    assert_eq!(payload["offset"], 0);
    assert!(payload.get("filter").is_none());
    assert!(payload.get("sorts").is_none());
}

#[test]
fn record_query_with_limit_and_offset() {
    let payload = RecordQuery::default()
        .with_limit(100)
        .with_offset(300)
        .to_payload();
    assert_eq!(payload["limit"], 100);
    assert_eq!(payload["offset"], 300);
}

#[test]
fn record_query_with_eq_filter() {
    let payload = RecordQuery::default()
        .with_eq("status", json!("Portfolio"))
        .to_payload();
    assert_eq!(payload["filter"]["status"]["$eq"], "Portfolio");
}

#[test]
fn record_query_with_in_filter() {
    let payload = RecordQuery::default()
        .with_in("fund", vec![json!("Fund I"), json!("Fund II")])
        .to_payload();
    assert_eq!(payload["filter"]["fund"]["$in"], json!(["Fund I", "Fund II"]));
}

#[test]
fn record_query_with_contains_filter() {
    let payload = RecordQuery::default()
        .with_contains("name", "acme")
        .to_payload();
    assert_eq!(payload["filter"]["name"]["$contains"], "acme");
}

#[test]
fn record_query_filters_on_distinct_slugs_merge() {
    let payload = RecordQuery::default()
        .with_eq("status", json!("Met"))
        .with_contains("name", "labs")
        .to_payload();
    let filter = payload["filter"].as_object().unwrap();
    assert_eq!(filter.len(), 2);
}

#[test]
fn record_query_with_sorts() {
    let payload = RecordQuery::default()
        .with_sort("created_at", SortDirection::Desc)
        .with_sort("name", SortDirection::Asc)
        .to_payload();
    let sorts = payload["sorts"].as_array().unwrap();
    assert_eq!(sorts.len(), 2);
    assert_eq!(sorts[0]["attribute"], "created_at");
    assert_eq!(sorts[0]["direction"], "desc");
    assert_eq!(sorts[1]["direction"], "asc");
}
