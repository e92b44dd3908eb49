//! Library layer for VentureOps: cached Attio client, funnel and coverage
//! derivation, assessments, and LP pipeline weighting.
//!
//! Wraps the `attio_api` crate with a TTL session cache and builds the
//! normalized views the dashboard renders from raw CRM records.

pub mod assessment;
pub mod cache;
pub mod client;
pub mod company;
pub mod error;
pub mod extract;
pub mod geo;
pub mod join;
pub mod pipeline;
pub mod redistribute;
pub mod stage;
pub mod store;

pub use attio_api;
pub use attio_api::types;
pub use attio_api::{Filter, Query, RecordQuery, Sort, SortDirection};

pub use cache::{CacheRegistry, SessionCache, SyncEvent};
pub use client::CachedClient;
pub use company::Company;
pub use error::VentureOpsError;
pub use join::{CoverageRow, Outcome};
pub use stage::FunnelStage;
pub use store::{AssessmentStore, MeetingRatingStore};
