//! The normalized company model the dashboard views consume.
//!
//! Built fresh from raw records on every fetch cycle, cached by the
//! session layer, and superseded (never mutated) by the next fetch.

use attio_api::types::RawRecord;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::{attr_country_code, attr_scalar, attr_scalars, attr_text};
use crate::geo::{display_region, filter_region};
use crate::stage::{classify, FunnelStage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    // Identity.
    pub id: String,
    pub name: String,
    // Classification.
    pub status: Option<String>,
    pub funnel_stage: FunnelStage,
    // Geography.
    pub country: Option<String>,
    pub display_region: Option<String>,
    /// Filter-bucket region, "Other" when unmapped.
    pub filter_region: String,
    // Temporal.
    pub first_email: Option<String>,
    pub last_email: Option<String>,
    pub first_calendar: Option<String>,
    pub last_calendar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub contact_year: Option<i32>,
    pub meeting_year: Option<i32>,
    // Ownership.
    pub owners: Vec<String>,
    // Business.
    pub industries: Vec<String>,
    pub funding_status: Option<String>,
    pub estimated_arr: Option<String>,
    pub employee_range: Option<String>,
    // Presentation.
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

fn timestamp_year(ts: &str) -> Option<i32> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.year());
    }
    let prefix = ts.get(..10).unwrap_or(ts);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

impl Company {
    pub fn from_record(record: &RawRecord) -> Company {
        let status = attr_text(record, "status");
        let first_email = attr_text(record, "first_email_interaction");
        let last_email = attr_text(record, "last_email_interaction");
        let first_calendar = attr_text(record, "first_calendar_interaction");
        let last_calendar = attr_text(record, "last_calendar_interaction");

        let funnel_stage = classify(
            status.as_deref(),
            first_email.is_some(),
            first_calendar.is_some(),
        );

        let country = attr_country_code(record, "primary_location")
            .or_else(|| attr_text(record, "country"));
        let display_region = country
            .as_deref()
            .and_then(display_region)
            .map(str::to_string);
        let filter_region = country
            .as_deref()
            .and_then(filter_region)
            .unwrap_or("Other")
            .to_string();

        let contact_year = first_email.as_deref().and_then(timestamp_year);
        let meeting_year = first_calendar.as_deref().and_then(timestamp_year);

        Company {
            id: record.id.record_id.clone(),
            name: attr_text(record, "name").unwrap_or_else(|| record.id.record_id.clone()),
            status,
            funnel_stage,
            country,
            display_region,
            filter_region,
            first_email,
            last_email,
            first_calendar,
            last_calendar,
            created_at: record.created_at,
            contact_year,
            meeting_year,
            owners: attr_scalars(record, "owner")
                .into_iter()
                .map(|s| s.to_text())
                .collect(),
            industries: attr_scalars(record, "industry")
                .into_iter()
                .map(|s| s.to_text())
                .collect(),
            funding_status: attr_text(record, "funding_status"),
            estimated_arr: attr_text(record, "estimated_arr"),
            employee_range: attr_scalar(record, "employee_range").map(|s| s.to_text()),
            logo_url: attr_text(record, "logo_url"),
            description: attr_text(record, "description"),
        }
    }
}
