//! HTTP client for the Attio CRM API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::{
    query::Query,
    types::{ListEntry, Page, RawRecord},
    Error,
};

/// HTTP client for the Attio v2 API.
///
/// Queries are POSTed as JSON payloads; the key comes from the
/// `ATTIO_API_KEY` environment variable. Each request builds a fresh
/// `reqwest::Client` with a 30-second timeout.
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.attio.com`.
    base_api_url: String,
    api_key: String,
}

impl Client {
    /// Creates a client for the production API, reading the key from the
    /// environment. Returns [`Error::MissingApiKey`] when it is absent.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("ATTIO_API_KEY").map_err(|_| Error::MissingApiKey)?;
        Ok(Self {
            base_api_url: "https://api.attio.com".to_string(),
            api_key,
        })
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    async fn read_body(resp: reqwest::Response) -> Result<(u16, String), Error> {
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;
        Ok((status, body))
    }

    async fn post<T>(&self, path: &str, payload: Value) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.get_url(path)?;
        let resp = self
            .http()?
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to query {}: {}", path, e);
                Error::RequestFailed
            })?;

        let (status, body) = Self::read_body(resp).await?;
        if !(200..300).contains(&status) {
            let snippet = truncate_body(&body);
            tracing::error!("Request to {} failed with status {}: {}", path, status, snippet);
            return Err(Error::HttpStatus {
                status,
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse response: {} | body: {}", e, snippet);
            Error::RequestFailed
        })
    }

    /// Queries object records (e.g. `companies`, `deals`).
    pub async fn query_records(
        &self,
        object: &str,
        query: &impl Query,
    ) -> Result<Page<RawRecord>, Error> {
        self.post(
            format!("/v2/objects/{}/records/query", object).as_str(),
            query.to_payload(),
        )
        .await
    }

    /// Queries entries of a named list.
    pub async fn query_entries(
        &self,
        list: &str,
        query: &impl Query,
    ) -> Result<Page<ListEntry>, Error> {
        self.post(
            format!("/v2/lists/{}/entries/query", list).as_str(),
            query.to_payload(),
        )
        .await
    }

    /// Overwrites one field on one list entry. No partial-failure semantics
    /// beyond erroring on a non-2xx response.
    pub async fn update_entry(
        &self,
        list: &str,
        entry_id: &str,
        slug: &str,
        value: Value,
    ) -> Result<(), Error> {
        let url = self.get_url(format!("/v2/lists/{}/entries/{}", list, entry_id).as_str())?;
        let payload = json!({
            "data": { "entry_values": { slug: [ { "value": value } ] } }
        });
        let resp = self
            .http()?
            .patch(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to update entry {}: {}", entry_id, e);
                Error::RequestFailed
            })?;

        let (status, body) = Self::read_body(resp).await?;
        if !(200..300).contains(&status) {
            let snippet = truncate_body(&body);
            tracing::error!("Entry update failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status,
                body: snippet,
            });
        }
        Ok(())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
