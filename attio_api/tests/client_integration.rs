use attio_api::{pagination, Client, Error, Query, RecordQuery};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn record(id: &str) -> serde_json::Value {
    json!({
        "id": { "record_id": id },
        "created_at": "2024-01-01T00:00:00Z",
        "values": {}
    })
}

#[tokio::test]
async fn query_records_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("companies.json");

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .query_records("companies", &RecordQuery::default())
        .await;
    assert!(result.is_ok());

    let page = result.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].id.record_id, "rec-acme");
}

#[tokio::test]
async fn query_records_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .query_records("companies", &RecordQuery::default())
        .await;
    match result {
        Err(Error::HttpStatus { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected HttpStatus error, got {:?}", other.map(|p| p.data.len())),
    }
}

#[tokio::test]
async fn query_records_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .query_records("companies", &RecordQuery::default())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn query_entries_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("entries.json");

    Mock::given(method("POST"))
        .and(path("/v2/lists/coverage/entries/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .query_entries("coverage", &RecordQuery::default())
        .await;
    assert!(result.is_ok());
    assert_eq!(result.unwrap().data[0].parent_record_id, "deal-1");
}

#[tokio::test]
async fn update_entry_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/lists/coverage/entries/entry-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .update_entry("coverage", "entry-1", "in_scope", json!(false))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn update_entry_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v2/lists/coverage/entries/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let result = client
        .update_entry("coverage", "missing", "in_scope", json!(true))
        .await;
    match result {
        Err(Error::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_all_stops_at_short_page() {
    let mock_server = MockServer::start().await;

    // Offset 0 comes back full, offset 2 is short; later offsets are left
    // unmocked and degrade to empty pages.
    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .and(body_partial_json(json!({ "offset": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [record("r1"), record("r2")]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .and(body_partial_json(json!({ "offset": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [record("r3")]
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let query = RecordQuery::default().with_limit(2);
    let rows = pagination::fetch_all_records(&client, "companies", &query)
        .await
        .unwrap();

    // Merged by offset, independent of arrival order.
    let ids: Vec<&str> = rows.iter().map(|r| r.id.record_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
}

#[tokio::test]
async fn fetch_all_short_first_page_skips_fan_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/deals/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [record("d1")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri(), "test-key");
    let query = RecordQuery::default().with_limit(2);
    let rows = pagination::fetch_all_records(&client, "deals", &query)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}
