//! Company assessment: completion percentage and weighted 0–10 score
//! over a structured multi-theme questionnaire.
//!
//! Three real field kinds plus display-only section markers. A `false`
//! check and an unmatched select are excluded from scoring rather than
//! zero-scored: an unanswered or not-yet-true field is missing
//! information, not a negative signal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Field kinds. `Section` rows are display-only and excluded from all
/// completion and scoring math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Section,
    Check,
    Rating,
    Select,
}

pub struct FieldDef {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Option ids for `Select` fields, empty otherwise.
    pub options: &'static [&'static str],
}

pub struct ThemeDef {
    pub id: &'static str,
    pub label: &'static str,
    pub fields: &'static [FieldDef],
}

const fn field(id: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef {
        id,
        label,
        kind,
        options: &[],
    }
}

const fn select(
    id: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldDef {
    FieldDef {
        id,
        label,
        kind: FieldKind::Select,
        options,
    }
}

// Classification option sets shared with the dashboard; the ids are a
// compatibility surface and must not be renamed.
pub const HEALTH_OPTIONS: &[&str] = &["green", "amber", "red"];
pub const DESTINY_OPTIONS: &[&str] = &["secured", "manageable", "at_risk", "critical"];
pub const US_EXPANSION_OPTIONS: &[&str] = &["none", "planned", "active"];

/// The assessment questionnaire, in display order.
pub static SCHEMA: &[ThemeDef] = &[
    ThemeDef {
        id: "team",
        label: "Team",
        fields: &[
            field("team_section", "Founding team", FieldKind::Section),
            field("founders_met", "Met all founders", FieldKind::Check),
            field("team_quality", "Team quality", FieldKind::Rating),
            field("references_done", "Reference calls done", FieldKind::Check),
            select(
                "founder_experience",
                "Founder experience",
                &["repeat_founder", "domain_expert", "first_timer"],
            ),
        ],
    },
    ThemeDef {
        id: "market",
        label: "Market",
        fields: &[
            field("market_section", "Market", FieldKind::Section),
            field("market_size", "Market size", FieldKind::Rating),
            select(
                "market_timing",
                "Market timing",
                &["too_early", "right_window", "late"],
            ),
            field("competition_mapped", "Competition mapped", FieldKind::Check),
        ],
    },
    ThemeDef {
        id: "product",
        label: "Product",
        fields: &[
            field("product_section", "Product", FieldKind::Section),
            field("product_demo", "Saw a live demo", FieldKind::Check),
            field("product_strength", "Product strength", FieldKind::Rating),
            select("moat", "Defensibility", &["strong", "emerging", "none"]),
        ],
    },
    ThemeDef {
        id: "traction",
        label: "Traction",
        fields: &[
            field("traction_section", "Traction", FieldKind::Section),
            field("revenue_verified", "Revenue verified", FieldKind::Check),
            field("growth", "Growth trajectory", FieldKind::Rating),
            select("health", "Portfolio health", HEALTH_OPTIONS),
        ],
    },
    ThemeDef {
        id: "expansion",
        label: "Expansion",
        fields: &[
            field("expansion_section", "Expansion", FieldKind::Section),
            select("destiny_control", "Control of destiny", DESTINY_OPTIONS),
            select("us_expansion", "US expansion", US_EXPANSION_OPTIONS),
            field("expansion_readiness", "Expansion readiness", FieldKind::Rating),
        ],
    },
];

/// Static label → score lookup for select fields. Labels missing here
/// are excluded from scoring, never zeroed.
static SELECT_SCORES: &[(&str, f64)] = &[
    ("repeat_founder", 9.0),
    ("domain_expert", 7.0),
    ("first_timer", 4.0),
    ("too_early", 4.0),
    ("right_window", 9.0),
    ("late", 3.0),
    ("strong", 9.0),
    ("emerging", 6.0),
    ("none", 2.0),
    ("green", 9.0),
    ("amber", 5.0),
    ("red", 2.0),
    ("secured", 9.0),
    ("manageable", 7.0),
    ("at_risk", 4.0),
    ("critical", 1.0),
    ("planned", 6.0),
    ("active", 9.0),
];

fn select_score(label: &str) -> Option<f64> {
    SELECT_SCORES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, score)| *score)
}

/// One stored field value. Untagged so the durable JSON stays the plain
/// `true` / `7` / `"green"` shapes the dashboard wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Check(bool),
    Rating(u8),
    Select(String),
}

/// Field id → value for one theme.
pub type ThemeData = HashMap<String, FieldValue>;
/// Theme id → theme data for one company.
pub type AssessmentData = HashMap<String, ThemeData>;

fn theme_def(theme_id: &str) -> Option<&'static ThemeDef> {
    SCHEMA.iter().find(|t| t.id == theme_id)
}

fn is_filled(def: &FieldDef, value: Option<&FieldValue>) -> bool {
    match (def.kind, value) {
        // False is "not yet confirmed", not "confirmed false".
        (FieldKind::Check, Some(FieldValue::Check(checked))) => *checked,
        (FieldKind::Rating, Some(FieldValue::Rating(_))) => true,
        (FieldKind::Select, Some(FieldValue::Select(label))) => !label.is_empty(),
        _ => false,
    }
}

/// Completion of one theme as an integer percentage. Section markers are
/// excluded from the denominator.
pub fn completion(data: &AssessmentData, theme_id: &str) -> u32 {
    let Some(theme) = theme_def(theme_id) else {
        return 0;
    };
    let values = data.get(theme_id);
    let real: Vec<&FieldDef> = theme
        .fields
        .iter()
        .filter(|f| f.kind != FieldKind::Section)
        .collect();
    if real.is_empty() {
        return 0;
    }
    let filled = real
        .iter()
        .filter(|def| is_filled(def, values.and_then(|v| v.get(def.id))))
        .count();
    ((100.0 * filled as f64) / real.len() as f64).round() as u32
}

/// Overall completion: unweighted mean of per-theme completion.
pub fn overall_completion(data: &AssessmentData) -> u32 {
    if SCHEMA.is_empty() {
        return 0;
    }
    let sum: u32 = SCHEMA.iter().map(|t| completion(data, t.id)).sum();
    ((sum as f64) / SCHEMA.len() as f64).round() as u32
}

/// Weighted 0–10 score of one theme, `None` when no field contributed.
pub fn score(data: &AssessmentData, theme_id: &str) -> Option<f64> {
    let theme = theme_def(theme_id)?;
    let values = data.get(theme_id)?;

    let mut total = 0.0;
    let mut counted = 0usize;
    for def in theme.fields {
        match (def.kind, values.get(def.id)) {
            (FieldKind::Check, Some(FieldValue::Check(true))) => {
                total += 10.0;
                counted += 1;
            }
            (FieldKind::Rating, Some(FieldValue::Rating(rating))) => {
                total += *rating as f64;
                counted += 1;
            }
            (FieldKind::Select, Some(FieldValue::Select(label))) => {
                if let Some(s) = select_score(label) {
                    total += s;
                    counted += 1;
                }
            }
            _ => {}
        }
    }
    if counted == 0 {
        None
    } else {
        Some(total / counted as f64)
    }
}

/// Overall score: mean of the per-theme scores that exist. Untouched
/// themes are omitted, they do not drag the average toward zero.
pub fn overall_score(data: &AssessmentData) -> Option<f64> {
    let scores: Vec<f64> = SCHEMA.iter().filter_map(|t| score(data, t.id)).collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
