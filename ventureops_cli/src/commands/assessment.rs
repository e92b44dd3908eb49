//! The `assessment` subcommand: per-company questionnaire kept in a
//! local store, scored on demand.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use ventureops_lib::assessment::{
    self, FieldDef, FieldKind, FieldValue, ThemeDef, SCHEMA,
};
use ventureops_lib::{AssessmentStore, MeetingRatingStore};

use crate::output::print_json;

#[derive(Args)]
pub struct AssessmentArgs {
    #[command(subcommand)]
    pub action: AssessmentAction,
}

#[derive(Subcommand)]
pub enum AssessmentAction {
    /// Print the stored assessment for a company
    Show { company_id: String },
    /// Set one field, e.g. `set rec-123 team founders_met true`
    Set {
        company_id: String,
        theme: String,
        field: String,
        value: String,
    },
    /// Completion and score per theme plus the overall roll-up
    Score { company_id: String },
    /// Rate a meeting 1-10
    Rate {
        company_id: String,
        meeting_id: String,
        rating: u8,
    },
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ventureops")
}

fn find_field(theme_id: &str, field_id: &str) -> Result<(&'static ThemeDef, &'static FieldDef)> {
    let Some(theme) = SCHEMA.iter().find(|t| t.id == theme_id) else {
        let known: Vec<&str> = SCHEMA.iter().map(|t| t.id).collect();
        bail!("unknown theme {:?}; themes: {}", theme_id, known.join(", "));
    };
    let Some(field) = theme.fields.iter().find(|f| f.id == field_id) else {
        let known: Vec<&str> = theme
            .fields
            .iter()
            .filter(|f| f.kind != FieldKind::Section)
            .map(|f| f.id)
            .collect();
        bail!("unknown field {:?}; fields: {}", field_id, known.join(", "));
    };
    Ok((theme, field))
}

fn parse_value(field: &FieldDef, raw: &str) -> Result<FieldValue> {
    match field.kind {
        FieldKind::Section => bail!("{} is a section header, not a field", field.id),
        FieldKind::Check => match raw {
            "true" | "yes" => Ok(FieldValue::Check(true)),
            "false" | "no" => Ok(FieldValue::Check(false)),
            _ => bail!("{} is a checkbox; pass true or false", field.id),
        },
        FieldKind::Rating => {
            let n: u8 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("{} is a 1-10 rating", field.id))?;
            if !(1..=10).contains(&n) {
                bail!("{} is a 1-10 rating, got {}", field.id, n);
            }
            Ok(FieldValue::Rating(n))
        }
        FieldKind::Select => {
            if !field.options.contains(&raw) {
                bail!(
                    "{} must be one of: {}",
                    field.id,
                    field.options.join(", ")
                );
            }
            Ok(FieldValue::Select(raw.to_string()))
        }
    }
}

// Assessments are nested maps, so this command always prints JSON.
pub fn run(args: &AssessmentArgs) -> Result<()> {
    let store = AssessmentStore::new(data_dir().join("assessments.json"));

    match &args.action {
        AssessmentAction::Show { company_id } => {
            let data = store.load(company_id);
            print_json(&data);
        }
        AssessmentAction::Set {
            company_id,
            theme,
            field,
            value,
        } => {
            let (theme_def, field_def) = find_field(theme, field)?;
            let parsed = parse_value(field_def, value)?;
            store.set_field(company_id, theme_def.id, field_def.id, parsed)?;
            println!("{}.{} set for {}", theme_def.id, field_def.id, company_id);
        }
        AssessmentAction::Score { company_id } => {
            let data = store.load(company_id);
            let themes: Vec<serde_json::Value> = SCHEMA
                .iter()
                .map(|theme| {
                    serde_json::json!({
                        "theme": theme.id,
                        "completion": assessment::completion(&data, theme.id),
                        "score": assessment::score(&data, theme.id),
                    })
                })
                .collect();
            let report = serde_json::json!({
                "themes": themes,
                "overall_completion": assessment::overall_completion(&data),
                "overall_score": assessment::overall_score(&data),
            });
            print_json(&report);
        }
        AssessmentAction::Rate {
            company_id,
            meeting_id,
            rating,
        } => {
            if !(1..=10).contains(rating) {
                bail!("rating must be 1-10, got {}", rating);
            }
            let ratings = MeetingRatingStore::new(data_dir().join("meeting_ratings.json"));
            ratings.set_rating(company_id, meeting_id, *rating)?;
            println!("meeting {} rated {} for {}", meeting_id, rating, company_id);
        }
    }
    Ok(())
}
