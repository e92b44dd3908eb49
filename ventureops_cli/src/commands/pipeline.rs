//! The `pipeline` subcommand: LP fundraising pipeline per fund.

use anyhow::{bail, Result};
use clap::Args;
use ventureops_lib::pipeline::{aggregate, Fund, LpRecord};
use ventureops_lib::CachedClient;

use crate::output::{print_json, print_pipeline_table, OutputFormat};

#[derive(Args)]
pub struct PipelineArgs {
    /// Which fund to aggregate: 1 or 2
    #[arg(long, default_value = "1")]
    pub fund: u8,
}

fn parse_fund(n: u8) -> Result<Fund> {
    match n {
        1 => Ok(Fund::FundOne),
        2 => Ok(Fund::FundTwo),
        other => bail!("unknown fund number: {}", other),
    }
}

pub async fn run(args: &PipelineArgs, client: &CachedClient, format: &OutputFormat) -> Result<()> {
    let fund = parse_fund(args.fund)?;
    let records = client.fetch_lps().await?;
    let lps: Vec<LpRecord> = records
        .iter()
        .map(|r| LpRecord::from_record(r, fund))
        .collect();
    let summary = aggregate(&lps, fund);

    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => print_pipeline_table(&summary),
    }
    Ok(())
}
