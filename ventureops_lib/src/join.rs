//! Company–deal–coverage join.
//!
//! Merges three independently fetched record sets into one denormalized
//! row per company. At most one deal attaches per company (latest
//! announced date wins) and at most one coverage entry per deal (last
//! seen wins). The transform is pure; fetching and caching are the
//! caller's concern.

use std::collections::HashMap;

use attio_api::types::{ListEntry, RawRecord};
use serde::{Deserialize, Serialize};

use crate::extract::{
    attr_country_code, attr_number, attr_scalar, attr_text, entry_bool, entry_number, Scalar,
};
use crate::geo::{amount_to_millions, date_to_quarter, filter_region, stage_from_label};
use crate::redistribute::redistribute_dates;
use crate::stage::is_passed_status;

// Company attribute slugs.
const COMPANY_STATUS: &str = "status";
const COMPANY_LOCATION: &str = "primary_location";
const COMPANY_COUNTRY_FALLBACK: &str = "country";
const COMPANY_FIRST_EMAIL: &str = "first_email_interaction";
const COMPANY_FIRST_CALENDAR: &str = "first_calendar_interaction";
const COMPANY_FUNDING_STATUS: &str = "funding_status";

// Deal attribute slugs.
const DEAL_COMPANY: &str = "associated_company";
const DEAL_ANNOUNCED: &str = "announced_date";
const DEAL_RECEIVED: &str = "received_date";
const DEAL_STATUS: &str = "status";
const DEAL_AMOUNT: &str = "amount";

// Coverage entry slugs.
pub const ENTRY_IN_SCOPE: &str = "in_scope";
const ENTRY_AMOUNT: &str = "amount_raised";
const ENTRY_SCORE: &str = "deal_score";

/// Deal statuses meaning the deal was surfaced to the team.
const DEAL_SURFACED_STATUSES: &[&str] = &[
    "Received",
    "Evaluating",
    "In Progress",
    "Invested",
    "Passed",
];

/// Company statuses indicating any post-intake progression. Membership
/// here is one of the "any signal counts" legs of `seen`.
const COMPANY_PROGRESSED_STATUSES: &[&str] = &[
    "Met",
    "To nurture",
    "Contacted / to meet",
    "Ghosting (Help)",
    "Dealflow",
    "Due Diligence",
    "Due Dilligence",
    "IC",
    "Portfolio",
    "Passed",
    "Analysed but too early",
];

/// What happened to a covered company, from the fund's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Invested,
    Passed,
    InProgress,
    Seen,
    Missed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Invested => "Invested",
            Outcome::Passed => "Passed",
            Outcome::InProgress => "In Progress",
            Outcome::Seen => "Seen",
            Outcome::Missed => "Missed",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One denormalized row: company plus its best-matching deal and that
/// deal's coverage entry, when they exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRow {
    pub company_id: String,
    pub company_name: String,
    pub country: Option<String>,
    /// Filter-bucket region, "Other" when unmapped.
    pub region: String,
    /// Funding stage label, "Unknown" when underivable.
    pub stage: String,
    pub announced_date: Option<String>,
    pub quarter: Option<String>,
    /// Round size in integer millions.
    pub amount_m: Option<i64>,
    pub seen: bool,
    pub outcome: Outcome,
    /// Defaults to true: absence of a coverage record is not evidence of
    /// out-of-scope.
    pub in_scope: bool,
    pub deal_id: Option<String>,
    pub entry_id: Option<String>,
    pub deal_score: Option<f64>,
}

fn in_status_set(status: Option<&str>, set: &[&str]) -> bool {
    match status {
        Some(status) => set
            .iter()
            .any(|s| status.trim().eq_ignore_ascii_case(s)),
        None => false,
    }
}

/// Latest-announced-date deal per company. Ties and reruns resolve to the
/// last deal scanned (last-write-wins-by-date, not first-seen).
fn best_deal_by_company(deals: &[RawRecord]) -> HashMap<String, &RawRecord> {
    let mut best: HashMap<String, &RawRecord> = HashMap::new();
    for deal in deals {
        let Some(company_id) = attr_text(deal, DEAL_COMPANY) else {
            continue;
        };
        let announced = attr_text(deal, DEAL_ANNOUNCED);
        match best.get(&company_id) {
            Some(current) if attr_text(current, DEAL_ANNOUNCED) > announced => {}
            _ => {
                best.insert(company_id, deal);
            }
        }
    }
    best
}

/// One coverage entry per deal; duplicates resolve to the last seen.
fn entry_by_deal(entries: &[ListEntry]) -> HashMap<&str, &ListEntry> {
    let mut map: HashMap<&str, &ListEntry> = HashMap::new();
    for entry in entries {
        map.insert(entry.parent_record_id.as_str(), entry);
    }
    map
}

fn resolve_outcome(
    company_status: Option<&str>,
    deal_status: Option<&str>,
    seen: bool,
) -> Outcome {
    // Company status is authoritative, deal status fills in behind it.
    if in_status_set(company_status, &["Portfolio"]) {
        return Outcome::Invested;
    }
    if company_status.map(is_passed_status).unwrap_or(false) {
        return Outcome::Passed;
    }
    if in_status_set(
        company_status,
        &["IC", "Due Diligence", "Due Dilligence", "Dealflow"],
    ) {
        return Outcome::InProgress;
    }
    if in_status_set(deal_status, &["Invested"]) {
        return Outcome::Invested;
    }
    if in_status_set(deal_status, &["Passed"]) {
        return Outcome::Passed;
    }
    if in_status_set(deal_status, &["Evaluating", "In Progress"]) {
        return Outcome::InProgress;
    }
    if seen {
        Outcome::Seen
    } else {
        Outcome::Missed
    }
}

/// Joins companies, deals, and coverage entries into one row per company,
/// then passes the rows through the date redistributor.
pub fn join_coverage(
    companies: &[RawRecord],
    deals: &[RawRecord],
    entries: &[ListEntry],
) -> Vec<CoverageRow> {
    let best_deals = best_deal_by_company(deals);
    let entries_by_deal = entry_by_deal(entries);

    let mut rows: Vec<CoverageRow> = companies
        .iter()
        .map(|company| {
            let company_id = company.id.record_id.clone();
            let deal = best_deals.get(&company_id).copied();
            let entry = deal.and_then(|d| entries_by_deal.get(d.id.record_id.as_str()).copied());

            let status = attr_text(company, COMPANY_STATUS);
            let deal_status = deal.and_then(|d| attr_text(d, DEAL_STATUS));

            let country = attr_country_code(company, COMPANY_LOCATION)
                .or_else(|| attr_text(company, COMPANY_COUNTRY_FALLBACK));
            let region = country
                .as_deref()
                .and_then(filter_region)
                .unwrap_or("Other")
                .to_string();

            let stage = deal
                .and_then(|d| attr_text(d, "name"))
                .and_then(|label| stage_from_label(&label))
                .or_else(|| attr_text(company, COMPANY_FUNDING_STATUS))
                .unwrap_or_else(|| "Unknown".to_string());

            let announced = deal.and_then(|d| attr_text(d, DEAL_ANNOUNCED));
            let received = deal.and_then(|d| attr_text(d, DEAL_RECEIVED));
            let date = announced
                .clone()
                .or_else(|| received.clone())
                .unwrap_or_else(|| company.created_at.format("%Y-%m-%d").to_string());

            let has_email = attr_scalar(company, COMPANY_FIRST_EMAIL).is_some();
            let has_calendar = attr_scalar(company, COMPANY_FIRST_CALENDAR).is_some();

            // Deliberate any-signal-counts union, not a precedence chain.
            let seen = in_status_set(deal_status.as_deref(), DEAL_SURFACED_STATUSES)
                || in_status_set(status.as_deref(), COMPANY_PROGRESSED_STATUSES)
                || has_email
                || has_calendar
                || received.is_some();

            let outcome = resolve_outcome(status.as_deref(), deal_status.as_deref(), seen);

            let amount_m = deal
                .and_then(|d| attr_number(d, DEAL_AMOUNT))
                .map(Scalar::Number)
                .or_else(|| entry.and_then(|e| entry_number(e, ENTRY_AMOUNT)).map(Scalar::Number))
                .and_then(|s| amount_to_millions(&s));

            CoverageRow {
                company_name: attr_text(company, "name").unwrap_or_else(|| company_id.clone()),
                company_id,
                country,
                region,
                stage,
                quarter: date_to_quarter(&date),
                announced_date: Some(date),
                amount_m,
                seen,
                outcome,
                in_scope: entry
                    .and_then(|e| entry_bool(e, ENTRY_IN_SCOPE))
                    .unwrap_or(true),
                deal_id: deal.map(|d| d.id.record_id.clone()),
                entry_id: entry.map(|e| e.id.entry_id.clone()),
                deal_score: entry.and_then(|e| entry_number(e, ENTRY_SCORE)),
            }
        })
        .collect();

    redistribute_dates(&mut rows);
    rows
}
