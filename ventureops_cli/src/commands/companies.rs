//! The `companies` subcommand: lists normalized companies with filters.

use anyhow::Result;
use clap::Args;
use ventureops_lib::{CachedClient, Company};

use crate::output::{print_companies_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CompaniesArgs {
    /// Filter by region bucket (e.g. Germany, Nordics, "UK & Ireland", Other)
    #[arg(long)]
    pub region: Option<String>,

    /// Filter by funnel stage (e.g. qualified, contacted, met, portfolio)
    #[arg(long)]
    pub stage: Option<String>,

    /// Filter by CRM status label (case-insensitive)
    #[arg(long)]
    pub status: Option<String>,

    /// Maximum rows to print
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

fn apply_filters(companies: Vec<Company>, args: &CompaniesArgs) -> Vec<Company> {
    let mut filtered: Vec<Company> = companies
        .into_iter()
        .filter(|c| {
            args.region
                .as_ref()
                .map_or(true, |r| c.filter_region.eq_ignore_ascii_case(r))
        })
        .filter(|c| {
            args.stage
                .as_ref()
                .map_or(true, |s| c.funnel_stage.as_str().eq_ignore_ascii_case(s))
        })
        .filter(|c| {
            args.status.as_ref().map_or(true, |wanted| {
                c.status
                    .as_ref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(wanted))
            })
        })
        .collect();
    filtered.sort_by(|a, b| a.name.cmp(&b.name));
    filtered.truncate(args.limit);
    filtered
}

pub async fn run(args: &CompaniesArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let companies = apply_filters(client.companies().await?, args);

    match format {
        OutputFormat::Json => print_json(&companies),
        OutputFormat::Table => print_companies_table(&companies),
    }
    Ok(())
}
