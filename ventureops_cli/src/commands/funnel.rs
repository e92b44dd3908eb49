//! The `funnel` subcommand: cumulative dealflow funnel over all companies.

use anyhow::Result;
use clap::Args;
use ventureops_lib::client::universe_fallback;
use ventureops_lib::stage::cumulative_funnel;
use ventureops_lib::{CachedClient, FunnelStage};

use crate::output::{print_funnel_table, print_json, OutputFormat};

#[derive(Args)]
pub struct FunnelArgs {
    /// Only count companies first contacted in this year
    #[arg(long)]
    pub year: Option<i32>,
}

fn widen_universe(mut funnel: Vec<(FunnelStage, usize)>, floor: usize) -> Vec<(FunnelStage, usize)> {
    // The CRM only holds companies someone already qualified; the full
    // sourcing universe is a configured estimate when it is larger.
    if let Some(universe) = funnel
        .iter_mut()
        .find(|(stage, _)| *stage == FunnelStage::Universe)
    {
        universe.1 = universe.1.max(floor);
    }
    funnel
}

pub async fn run(args: &FunnelArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let companies = client.companies().await?;

    let stages: Vec<FunnelStage> = companies
        .iter()
        .filter(|c| args.year.map_or(true, |y| c.contact_year == Some(y)))
        .map(|c| c.funnel_stage)
        .collect();

    let funnel = widen_universe(cumulative_funnel(&stages), universe_fallback());

    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = funnel
                .iter()
                .map(|(stage, count)| {
                    serde_json::json!({ "stage": stage.as_str(), "count": count })
                })
                .collect();
            print_json(&rows);
        }
        OutputFormat::Table => print_funnel_table(&funnel),
    }
    Ok(())
}
