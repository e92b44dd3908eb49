//! Limited-partner pipeline weighting.
//!
//! Each fund carries a static ordered stage table mapping raw CRM status
//! strings to a stage id and a probability-of-close weight. LPs with an
//! interest flag but no formal status surface in virtual pre-pipeline
//! stages; LPs matching nothing land in a "no status" bucket rather than
//! being dropped or misclassified.

use attio_api::types::RawRecord;
use serde::{Deserialize, Serialize};

use crate::extract::{attr_number, attr_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fund {
    FundOne,
    FundTwo,
}

impl Fund {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fund::FundOne => "Fund I",
            Fund::FundTwo => "Fund II",
        }
    }

    /// Fund-specific commitment-amount slug.
    fn amount_slug(&self) -> &'static str {
        match self {
            Fund::FundOne => "fund_one_amount",
            Fund::FundTwo => "fund_two_amount",
        }
    }

    /// Fund-specific pipeline status slug.
    fn status_slug(&self) -> &'static str {
        match self {
            Fund::FundOne => "fund_one_status",
            Fund::FundTwo => "fund_two_status",
        }
    }
}

/// Cross-fund proxy used when the fund-specific amount is absent.
const PROXY_AMOUNT_SLUG: &str = "typical_commitment";
const INTEREST_SLUG: &str = "interest";

/// One pipeline stage: display id, matching CRM statuses, and the
/// probability-of-close weight applied to pending amounts.
pub struct StageDef {
    pub id: &'static str,
    pub statuses: &'static [&'static str],
    pub weight: f64,
}

/// Virtual pre-pipeline stage for LPs with a positive or uncertain
/// interest flag and no formal status.
pub const INTERESTED: &str = "interested";
/// Terminal stage, also the landing spot for a negative interest flag.
pub const DECLINED: &str = "declined";

static FUND_ONE_STAGES: &[StageDef] = &[
    StageDef { id: "contacted", statuses: &["Contacted"], weight: 0.05 },
    StageDef { id: "meeting", statuses: &["Meeting scheduled", "Met"], weight: 0.10 },
    StageDef { id: "diligence", statuses: &["In due diligence"], weight: 0.30 },
    StageDef { id: "verbal", statuses: &["Verbally committed"], weight: 0.60 },
    StageDef { id: "oral_agreement", statuses: &["Oral agreement"], weight: 0.90 },
    StageDef { id: "signed", statuses: &["Signed", "Wired"], weight: 1.00 },
    StageDef { id: DECLINED, statuses: &["Declined", "Passed"], weight: 0.0 },
];

static FUND_TWO_STAGES: &[StageDef] = &[
    StageDef { id: "contacted", statuses: &["Contacted"], weight: 0.05 },
    StageDef { id: "meeting", statuses: &["Meeting scheduled", "Met"], weight: 0.10 },
    StageDef { id: "diligence", statuses: &["In due diligence"], weight: 0.30 },
    StageDef { id: "verbal", statuses: &["Verbally committed"], weight: 0.60 },
    StageDef { id: "oral_agreement", statuses: &["Oral agreement"], weight: 0.90 },
    StageDef { id: "second_close", statuses: &["Second closing agreement"], weight: 0.95 },
    StageDef { id: "signed", statuses: &["Signed", "Wired"], weight: 1.00 },
    StageDef { id: DECLINED, statuses: &["Declined", "Passed"], weight: 0.0 },
];

pub fn stage_table(fund: Fund) -> &'static [StageDef] {
    match fund {
        Fund::FundOne => FUND_ONE_STAGES,
        Fund::FundTwo => FUND_TWO_STAGES,
    }
}

/// Terminal success stages whose amounts count as committed. The set
/// varies with each fund's stage table.
pub fn committed_stage_ids(fund: Fund) -> &'static [&'static str] {
    match fund {
        Fund::FundOne => &["oral_agreement", "signed"],
        Fund::FundTwo => &["oral_agreement", "second_close", "signed"],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    Positive,
    Uncertain,
    Negative,
}

/// One LP, flattened for the weighting engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpRecord {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub interest: Option<Interest>,
    /// Fund-specific commitment amount.
    pub amount: Option<f64>,
    /// Cross-fund proxy amount, used as a flagged estimate.
    pub proxy_amount: Option<f64>,
}

impl LpRecord {
    pub fn from_record(record: &RawRecord, fund: Fund) -> Self {
        let interest = attr_text(record, INTEREST_SLUG).and_then(|flag| {
            match flag.trim().to_ascii_lowercase().as_str() {
                "yes" | "interested" => Some(Interest::Positive),
                "maybe" | "unsure" => Some(Interest::Uncertain),
                "no" | "not interested" => Some(Interest::Negative),
                _ => None,
            }
        });
        LpRecord {
            id: record.id.record_id.clone(),
            name: attr_text(record, "name").unwrap_or_else(|| record.id.record_id.clone()),
            status: attr_text(record, fund.status_slug()),
            interest,
            amount: attr_number(record, fund.amount_slug()),
            proxy_amount: attr_number(record, PROXY_AMOUNT_SLUG),
        }
    }

    /// Amount with its estimate flag: true when the cross-fund proxy
    /// stood in for the fund-specific amount.
    pub fn effective_amount(&self) -> Option<(f64, bool)> {
        match (self.amount, self.proxy_amount) {
            (Some(amount), _) => Some((amount, false)),
            (None, Some(proxy)) => Some((proxy, true)),
            (None, None) => None,
        }
    }
}

/// Where one LP landed: a table stage id, a virtual stage id, or no
/// status at all.
pub fn resolve_stage(lp: &LpRecord, fund: Fund) -> Option<&'static str> {
    if let Some(status) = lp.status.as_deref() {
        for stage in stage_table(fund) {
            if stage
                .statuses
                .iter()
                .any(|s| status.trim().eq_ignore_ascii_case(s))
            {
                return Some(stage.id);
            }
        }
        return None;
    }
    match lp.interest {
        Some(Interest::Positive) | Some(Interest::Uncertain) => Some(INTERESTED),
        Some(Interest::Negative) => Some(DECLINED),
        None => None,
    }
}

/// Per-stage aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageAggregate {
    pub id: String,
    pub weight: f64,
    pub count: usize,
    /// Unweighted amount total.
    pub total: f64,
    /// `amount * weight` total.
    pub weighted: f64,
    /// How many amounts in this stage were proxy estimates.
    pub estimated_count: usize,
}

/// Whole-pipeline aggregate for one fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub fund: Fund,
    /// Table stages in order, then the virtual `interested` stage.
    pub stages: Vec<StageAggregate>,
    /// LPs with an unmatched or absent status and no interest flag.
    pub no_status: usize,
    /// Totals over stages that are part of the funnel being measured;
    /// `declined` and `interested` are informational only.
    pub active_total: f64,
    pub active_weighted: f64,
    /// Unweighted amount over the fund's terminal success stages.
    pub committed: f64,
}

/// Buckets LPs into stages and computes weighted and unweighted totals.
pub fn aggregate(lps: &[LpRecord], fund: Fund) -> PipelineSummary {
    let mut stages: Vec<StageAggregate> = stage_table(fund)
        .iter()
        .map(|def| StageAggregate {
            id: def.id.to_string(),
            weight: def.weight,
            count: 0,
            total: 0.0,
            weighted: 0.0,
            estimated_count: 0,
        })
        .collect();
    // Virtual pre-pipeline stage, carried for display only.
    stages.push(StageAggregate {
        id: INTERESTED.to_string(),
        weight: 0.0,
        count: 0,
        total: 0.0,
        weighted: 0.0,
        estimated_count: 0,
    });

    let mut no_status = 0usize;
    for lp in lps {
        let Some(stage_id) = resolve_stage(lp, fund) else {
            no_status += 1;
            continue;
        };
        let Some(bucket) = stages.iter_mut().find(|s| s.id == stage_id) else {
            continue;
        };
        bucket.count += 1;
        if let Some((amount, estimated)) = lp.effective_amount() {
            bucket.total += amount;
            bucket.weighted += amount * bucket.weight;
            if estimated {
                bucket.estimated_count += 1;
            }
        }
    }

    let active = |s: &StageAggregate| s.id != DECLINED && s.id != INTERESTED;
    let active_total = stages.iter().filter(|s| active(s)).map(|s| s.total).sum();
    let active_weighted = stages.iter().filter(|s| active(s)).map(|s| s.weighted).sum();
    let committed = stages
        .iter()
        .filter(|s| committed_stage_ids(fund).contains(&s.id.as_str()))
        .map(|s| s.total)
        .sum();

    PipelineSummary {
        fund,
        stages,
        no_status,
        active_total,
        active_weighted,
        committed,
    }
}
