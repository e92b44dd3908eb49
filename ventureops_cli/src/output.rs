use serde::Serialize;
use tabled::{Table, Tabled};
use ventureops_lib::pipeline::PipelineSummary;
use ventureops_lib::{Company, CoverageRow, FunnelStage};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct CompanyRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Stage")]
    #[serde(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Country")]
    #[serde(rename = "Country")]
    country: String,
    #[tabled(rename = "Region")]
    #[serde(rename = "Region")]
    region: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Industry")]
    #[serde(rename = "Industry")]
    industry: String,
}

#[derive(Tabled, Serialize)]
struct FunnelRow {
    #[tabled(rename = "Stage")]
    #[serde(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Companies")]
    #[serde(rename = "Companies")]
    count: usize,
}

#[derive(Tabled, Serialize)]
struct CoverageTableRow {
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Country")]
    #[serde(rename = "Country")]
    country: String,
    #[tabled(rename = "Stage")]
    #[serde(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Quarter")]
    #[serde(rename = "Quarter")]
    quarter: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Outcome")]
    #[serde(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Seen")]
    #[serde(rename = "Seen")]
    seen: String,
    #[tabled(rename = "In Scope")]
    #[serde(rename = "In Scope")]
    in_scope: String,
}

#[derive(Tabled, Serialize)]
struct PipelineRow {
    #[tabled(rename = "Stage")]
    #[serde(rename = "Stage")]
    stage: String,
    #[tabled(rename = "LPs")]
    #[serde(rename = "LPs")]
    count: usize,
    #[tabled(rename = "Total")]
    #[serde(rename = "Total")]
    total: String,
    #[tabled(rename = "Weighted")]
    #[serde(rename = "Weighted")]
    weighted: String,
    #[tabled(rename = "Estimated")]
    #[serde(rename = "Estimated")]
    estimated: usize,
}

// -- Row builders --

fn build_company_rows(companies: &[Company]) -> Vec<CompanyRow> {
    companies
        .iter()
        .map(|c| CompanyRow {
            name: c.name.clone(),
            stage: c.funnel_stage.to_string(),
            country: c.country.clone().unwrap_or_default(),
            region: c.filter_region.clone(),
            status: c.status.clone().unwrap_or_default(),
            industry: c.industries.join(", "),
        })
        .collect()
}

fn build_funnel_rows(funnel: &[(FunnelStage, usize)]) -> Vec<FunnelRow> {
    funnel
        .iter()
        .map(|(stage, count)| FunnelRow {
            stage: stage.to_string(),
            count: *count,
        })
        .collect()
}

fn build_coverage_rows(rows: &[CoverageRow]) -> Vec<CoverageTableRow> {
    rows.iter()
        .map(|r| CoverageTableRow {
            company: r.company_name.clone(),
            country: r.country.clone().unwrap_or_default(),
            stage: r.stage.clone(),
            quarter: r.quarter.clone().unwrap_or_default(),
            amount: r
                .amount_m
                .map(|m| format!("€{}M", m))
                .unwrap_or_default(),
            outcome: r.outcome.to_string(),
            seen: yes_no(r.seen),
            in_scope: yes_no(r.in_scope),
        })
        .collect()
}

fn build_pipeline_rows(summary: &PipelineSummary) -> Vec<PipelineRow> {
    summary
        .stages
        .iter()
        .map(|s| PipelineRow {
            stage: s.id.clone(),
            count: s.count,
            total: format_amount(s.total),
            weighted: format_amount(s.weighted),
            estimated: s.estimated_count,
        })
        .collect()
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn format_amount(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("€{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("€{:.1}K", value / 1_000.0)
    } else {
        format!("€{:.0}", value)
    }
}

// -- Table output --

pub fn print_companies_table(companies: &[Company]) {
    println!("{}", Table::new(build_company_rows(companies)));
}

pub fn print_funnel_table(funnel: &[(FunnelStage, usize)]) {
    println!("{}", Table::new(build_funnel_rows(funnel)));
}

pub fn print_coverage_table(rows: &[CoverageRow]) {
    println!("{}", Table::new(build_coverage_rows(rows)));
}

pub fn print_pipeline_table(summary: &PipelineSummary) {
    println!("{}", Table::new(build_pipeline_rows(summary)));
    println!(
        "active: {}  weighted: {}  committed: {}  no status: {}",
        format_amount(summary.active_total),
        format_amount(summary.active_weighted),
        format_amount(summary.committed),
        summary.no_status
    );
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
