//! The `coverage` subcommand: market coverage rows and the scope toggle.

use anyhow::Result;
use clap::{Args, Subcommand};
use ventureops_lib::{CachedClient, CoverageRow};

use crate::output::{print_coverage_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CoverageArgs {
    #[command(subcommand)]
    pub action: CoverageAction,
}

#[derive(Subcommand)]
pub enum CoverageAction {
    /// List coverage rows, one per company
    List {
        /// Filter by quarter label (e.g. "Q1 2024")
        #[arg(long)]
        quarter: Option<String>,

        /// Filter by outcome: Invested, Passed, "In Progress", Seen, Missed
        #[arg(long)]
        outcome: Option<String>,

        /// Include rows flagged out of scope
        #[arg(long)]
        all: bool,
    },
    /// Flag a coverage entry in or out of scope
    SetScope {
        /// The list entry id to update
        entry_id: String,

        /// New scope value: true or false
        value: bool,
    },
}

fn filter_rows(
    rows: Vec<CoverageRow>,
    quarter: Option<&str>,
    outcome: Option<&str>,
    all: bool,
) -> Vec<CoverageRow> {
    rows.into_iter()
        .filter(|r| all || r.in_scope)
        .filter(|r| quarter.map_or(true, |q| r.quarter.as_deref() == Some(q)))
        .filter(|r| outcome.map_or(true, |o| r.outcome.as_str().eq_ignore_ascii_case(o)))
        .collect()
}

pub async fn run(args: &CoverageArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    match &args.action {
        CoverageAction::List {
            quarter,
            outcome,
            all,
        } => {
            let rows = filter_rows(
                client.coverage_rows().await?,
                quarter.as_deref(),
                outcome.as_deref(),
                *all,
            );
            match format {
                OutputFormat::Json => print_json(&rows),
                OutputFormat::Table => print_coverage_table(&rows),
            }
        }
        CoverageAction::SetScope { entry_id, value } => {
            client.set_coverage_scope(entry_id, *value).await?;
            println!(
                "entry {} is now {} scope",
                entry_id,
                if *value { "in" } else { "out of" }
            );
        }
    }
    Ok(())
}
