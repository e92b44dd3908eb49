use std::sync::Arc;
use std::time::Duration;

use ventureops_lib::attio_api::Client;
use ventureops_lib::cache::{CacheRegistry, MemoryStorage};
use ventureops_lib::CachedClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record_page(ids: &[&str]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": { "record_id": id },
                "created_at": "2024-01-15T10:00:00Z",
                "values": {
                    "name": [{ "value": format!("Company {}", id) }]
                }
            })
        })
        .collect();
    serde_json::json!({ "data": data })
}

fn cached_client(server: &MockServer, ttl: Duration) -> CachedClient {
    let inner = Client::with_base_url(&server.uri(), "test-key");
    let registry = CacheRegistry::new(Arc::new(MemoryStorage::new()));
    CachedClient::with_ttl(inner, &registry, ttl)
}

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_page(&["c1", "c2"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = cached_client(&server, Duration::from_secs(60));

    let first = client.fetch_companies().await.unwrap();
    let second = client.fetch_companies().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].id.record_id, "c1");
}

#[tokio::test]
async fn expired_cache_falls_back_to_stale_on_error() {
    let server = MockServer::start().await;

    // First call succeeds, everything after is an outage.
    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_page(&["c1"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = cached_client(&server, Duration::from_millis(50));

    let fresh = client.fetch_companies().await.unwrap();
    assert_eq!(fresh.len(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let stale = client.fetch_companies().await.unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id.record_id, "c1");
}

#[tokio::test]
async fn error_with_no_cache_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/deals/records/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = cached_client(&server, Duration::from_secs(60));
    let err = client.fetch_deals().await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn sync_all_invalidates_registered_caches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_page(&["c1"])))
        .expect(2)
        .mount(&server)
        .await;

    let inner = Client::with_base_url(&server.uri(), "test-key");
    let registry = CacheRegistry::new(Arc::new(MemoryStorage::new()));
    let client = CachedClient::with_ttl(inner, &registry, Duration::from_secs(60));
    let mut events = registry.subscribe();

    client.fetch_companies().await.unwrap();
    registry.sync_all();
    client.fetch_companies().await.unwrap();

    assert!(events.try_recv().is_ok());
}

#[tokio::test]
async fn blank_entry_id_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    // No PATCH mock mounted: reaching the network would 404 instead.

    let client = cached_client(&server, Duration::from_secs(60));
    let err = client.set_coverage_scope("  ", true).await.unwrap_err();
    assert!(matches!(err, ventureops_lib::VentureOpsError::InvalidInput(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn failed_scope_write_does_not_revive_expired_entries() {
    let server = MockServer::start().await;

    let first_page = serde_json::json!({
        "data": [{
            "id": { "entry_id": "e1" },
            "parent_record_id": "d1",
            "created_at": "2024-01-01T00:00:00Z",
            "entry_values": {}
        }]
    });
    let second_page = serde_json::json!({
        "data": [{
            "id": { "entry_id": "e2" },
            "parent_record_id": "d2",
            "created_at": "2024-01-01T00:00:00Z",
            "entry_values": {}
        }]
    });
    Mock::given(method("POST"))
        .and(path("/v2/lists/coverage/entries/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/lists/coverage/entries/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(second_page))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v2/lists/coverage/entries/e1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("write rejected"))
        .mount(&server)
        .await;

    let client = cached_client(&server, Duration::from_millis(50));

    let cached = client.fetch_coverage_entries().await.unwrap();
    assert_eq!(cached[0].id.entry_id, "e1");

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(client.set_coverage_scope("e1", false).await.is_err());

    // The rolled-back entry set is still expired, so the next read goes
    // back to the wire instead of serving the pre-write snapshot fresh.
    let refetched = client.fetch_coverage_entries().await.unwrap();
    assert_eq!(refetched[0].id.entry_id, "e2");
}

#[tokio::test]
async fn coverage_rows_join_all_three_sources() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/objects/companies/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": { "record_id": "c1" },
                "created_at": "2024-01-15T10:00:00Z",
                "values": {
                    "name": [{ "value": "Acme" }],
                    "status": [{ "status": { "title": "Portfolio" } }],
                    "primary_location": [{ "country_code": "FR" }]
                }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/objects/deals/records/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/lists/coverage/entries/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = cached_client(&server, Duration::from_secs(60));
    let rows = client.coverage_rows().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_name, "Acme");
    assert_eq!(rows[0].country.as_deref(), Some("FR"));
    assert_eq!(rows[0].outcome, ventureops_lib::Outcome::Invested);
}
