//! Funnel stage derivation.
//!
//! Status labels are manually maintained and authoritative when present;
//! interaction timestamps are auto-tracked and backfill the funnel
//! position when the status is ambiguous, terminal, or missing. The
//! precedence lives in ordered rule tables so each rule is testable in
//! isolation.

use serde::{Deserialize, Serialize};

/// A company's position in the sourcing-to-investment pipeline. The
/// variant order is the display order, and a company at stage N counts
/// toward every stage at or below N in cumulative funnel totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Universe,
    Qualified,
    Contacted,
    Met,
    Dealflow,
    Analysis,
    Committee,
    Portfolio,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 8] = [
        FunnelStage::Universe,
        FunnelStage::Qualified,
        FunnelStage::Contacted,
        FunnelStage::Met,
        FunnelStage::Dealflow,
        FunnelStage::Analysis,
        FunnelStage::Committee,
        FunnelStage::Portfolio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Universe => "universe",
            FunnelStage::Qualified => "qualified",
            FunnelStage::Contacted => "contacted",
            FunnelStage::Met => "met",
            FunnelStage::Dealflow => "dealflow",
            FunnelStage::Analysis => "analysis",
            FunnelStage::Committee => "committee",
            FunnelStage::Portfolio => "portfolio",
        }
    }

    /// Zero-based position in the display order.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statuses that always win: a human manually advanced the record past
/// what automated signals would infer.
const OVERRIDE_STATUSES: &[(&str, FunnelStage)] = &[
    ("Portfolio", FunnelStage::Portfolio),
    ("IC", FunnelStage::Committee),
    ("Due Diligence", FunnelStage::Analysis),
    // The upstream system of record still emits this spelling.
    ("Due Dilligence", FunnelStage::Analysis),
    ("Dealflow", FunnelStage::Dealflow),
];

/// Softer signals, honored only when no override applies.
const HINT_STATUSES: &[(&str, FunnelStage)] = &[
    ("Met", FunnelStage::Met),
    ("To nurture", FunnelStage::Met),
    ("Contacted / to meet", FunnelStage::Contacted),
    ("Ghosting (Help)", FunnelStage::Contacted),
];

/// Terminal statuses for companies that were passed on. The stage is
/// then derived from the highest interaction signal reached before the
/// pass, preserving "how far we got".
pub const PASSED_STATUSES: &[&str] = &[
    "To Decline",
    "Passed",
    "Analysed but too early",
    "No US path for now",
    "Old/Out of scope",
];

fn status_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b)
}

pub fn is_passed_status(status: &str) -> bool {
    PASSED_STATUSES.iter().any(|s| status_eq(status, s))
}

fn interaction_stage(has_email: bool, has_calendar: bool) -> FunnelStage {
    if has_calendar {
        FunnelStage::Met
    } else if has_email {
        FunnelStage::Contacted
    } else {
        FunnelStage::Qualified
    }
}

/// Derives the funnel stage for one company. First matching rule wins:
/// override status, hint status, then the interaction cascade (which
/// covers both terminal/passed statuses and unrecognized ones).
pub fn classify(status: Option<&str>, has_email: bool, has_calendar: bool) -> FunnelStage {
    if let Some(status) = status {
        for (label, stage) in OVERRIDE_STATUSES {
            if status_eq(status, label) {
                return *stage;
            }
        }
        for (label, stage) in HINT_STATUSES {
            if status_eq(status, label) {
                return *stage;
            }
        }
    }
    interaction_stage(has_email, has_calendar)
}

/// Cumulative funnel totals: each company's stage counts toward every
/// stage at or below its own rank.
pub fn cumulative_funnel(stages: &[FunnelStage]) -> Vec<(FunnelStage, usize)> {
    FunnelStage::ALL
        .iter()
        .map(|stage| {
            let count = stages.iter().filter(|s| s.rank() >= stage.rank()).count();
            (*stage, count)
        })
        .collect()
}
