//! Caching wrapper around the API client.
//!
//! Record sets are cached in the session layer for ten minutes; cache
//! hits bypass the network entirely. When a fetch fails and a stale
//! cached copy exists, the stale copy is returned instead of the error,
//! so a flaky upstream degrades to last-known-good data.

use std::time::Duration;

use attio_api::types::{AttributeValue, ListEntry, RawRecord};
use attio_api::{pagination, Client, RecordQuery};
use serde_json::Value;

use crate::cache::{CacheRegistry, SessionCache, SESSION_TTL};
use crate::company::Company;
use crate::error::VentureOpsError;
use crate::join::{join_coverage, CoverageRow, ENTRY_IN_SCOPE};

const COMPANIES_OBJECT: &str = "companies";
const DEALS_OBJECT: &str = "deals";
const LPS_OBJECT: &str = "lps";
const COVERAGE_LIST: &str = "coverage";

/// API client wrapper that adds session caching and stale fallback.
pub struct CachedClient {
    inner: Client,
    companies_cache: SessionCache<Vec<RawRecord>>,
    deals_cache: SessionCache<Vec<RawRecord>>,
    lps_cache: SessionCache<Vec<RawRecord>>,
    entries_cache: SessionCache<Vec<ListEntry>>,
}

impl CachedClient {
    /// Creates a cached client registering its slots with the given
    /// registry, so a bulk sync invalidates them too.
    pub fn new(inner: Client, registry: &CacheRegistry) -> Self {
        Self::with_ttl(inner, registry, SESSION_TTL)
    }

    /// Custom TTL variant, used by tests.
    pub fn with_ttl(inner: Client, registry: &CacheRegistry, ttl: Duration) -> Self {
        Self {
            inner,
            companies_cache: registry.cache("records:companies", ttl),
            deals_cache: registry.cache("records:deals", ttl),
            lps_cache: registry.cache("records:lps", ttl),
            entries_cache: registry.cache("entries:coverage", ttl),
        }
    }

    async fn fetch_records(
        &self,
        object: &str,
        cache: &SessionCache<Vec<RawRecord>>,
    ) -> Result<Vec<RawRecord>, VentureOpsError> {
        if let Some(cached) = cache.get() {
            return Ok(cached);
        }
        match pagination::fetch_all_records(&self.inner, object, &RecordQuery::default()).await {
            Ok(rows) => {
                cache.set(&rows);
                Ok(rows)
            }
            Err(e) => match cache.get_stale() {
                Some(stale) => {
                    tracing::warn!("{} fetch failed, serving stale cache: {}", object, e);
                    Ok(stale)
                }
                None => Err(e.into()),
            },
        }
    }

    /// Fetches all companies, cached.
    pub async fn fetch_companies(&self) -> Result<Vec<RawRecord>, VentureOpsError> {
        self.fetch_records(COMPANIES_OBJECT, &self.companies_cache)
            .await
    }

    /// Fetches all deals, cached.
    pub async fn fetch_deals(&self) -> Result<Vec<RawRecord>, VentureOpsError> {
        self.fetch_records(DEALS_OBJECT, &self.deals_cache).await
    }

    /// Fetches all LP records, cached.
    pub async fn fetch_lps(&self) -> Result<Vec<RawRecord>, VentureOpsError> {
        self.fetch_records(LPS_OBJECT, &self.lps_cache).await
    }

    /// Fetches all coverage-list entries, cached.
    pub async fn fetch_coverage_entries(&self) -> Result<Vec<ListEntry>, VentureOpsError> {
        if let Some(cached) = self.entries_cache.get() {
            return Ok(cached);
        }
        match pagination::fetch_all_entries(&self.inner, COVERAGE_LIST, &RecordQuery::default())
            .await
        {
            Ok(rows) => {
                self.entries_cache.set(&rows);
                Ok(rows)
            }
            Err(e) => match self.entries_cache.get_stale() {
                Some(stale) => {
                    tracing::warn!("coverage fetch failed, serving stale cache: {}", e);
                    Ok(stale)
                }
                None => Err(e.into()),
            },
        }
    }

    /// Normalized companies built fresh from the (possibly cached) raw set.
    pub async fn companies(&self) -> Result<Vec<Company>, VentureOpsError> {
        let raw = self.fetch_companies().await?;
        Ok(raw.iter().map(Company::from_record).collect())
    }

    /// The full coverage join: one row per company.
    pub async fn coverage_rows(&self) -> Result<Vec<CoverageRow>, VentureOpsError> {
        let companies = self.fetch_companies().await?;
        let deals = self.fetch_deals().await?;
        let entries = self.fetch_coverage_entries().await?;
        Ok(join_coverage(&companies, &deals, &entries))
    }

    /// Toggles the scope flag of one coverage entry.
    ///
    /// The cached entry set is updated before the write goes out so a
    /// re-render sees the new value immediately; if the write fails the
    /// previous cached set is restored and the error surfaced.
    pub async fn set_coverage_scope(
        &self,
        entry_id: &str,
        in_scope: bool,
    ) -> Result<(), VentureOpsError> {
        if entry_id.trim().is_empty() {
            return Err(VentureOpsError::InvalidInput(
                "entry id must not be empty".to_string(),
            ));
        }
        let snapshot = self.entries_cache.snapshot();
        if let Some(mut entries) = self.entries_cache.get_stale() {
            for entry in entries.iter_mut() {
                if entry.id.entry_id == entry_id {
                    entry.entry_values.insert(
                        ENTRY_IN_SCOPE.to_string(),
                        vec![AttributeValue::Text {
                            value: Value::Bool(in_scope),
                        }],
                    );
                }
            }
            self.entries_cache.set(&entries);
        }
        match self
            .inner
            .update_entry(COVERAGE_LIST, entry_id, ENTRY_IN_SCOPE, Value::Bool(in_scope))
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                // Envelope restore, not a re-set: the original timestamp
                // comes back with it.
                self.entries_cache.restore(snapshot);
                Err(e.into())
            }
        }
    }

    /// Overwrites one coverage field on one list entry.
    pub async fn update_coverage_field(
        &self,
        entry_id: &str,
        slug: &str,
        value: Value,
    ) -> Result<(), VentureOpsError> {
        self.inner
            .update_entry(COVERAGE_LIST, entry_id, slug, value)
            .await?;
        Ok(())
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

/// Fallback size of the qualified universe when the live count cannot be
/// fetched. A configuration value with no derivation.
pub fn universe_fallback() -> usize {
    env_usize("VENTUREOPS_UNIVERSE_FALLBACK", 1200)
}
