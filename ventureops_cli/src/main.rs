mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ventureops_lib::attio_api::Client;
use ventureops_lib::cache::{CacheRegistry, FileStorage};
use ventureops_lib::CachedClient;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ventureops")]
#[command(about = "VC operations over the Attio CRM: funnel, coverage, assessments, LP pipeline")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List companies from the CRM
    Companies(commands::companies::CompaniesArgs),
    /// Show the cumulative dealflow funnel
    Funnel(commands::funnel::FunnelArgs),
    /// Market coverage: per-company deal rows and scope flags
    Coverage(commands::coverage::CoverageArgs),
    /// LP fundraising pipeline, weighted by stage
    Pipeline(commands::pipeline::PipelineArgs),
    /// Company assessments: show, set fields, score
    Assessment(commands::assessment::AssessmentArgs),
    /// Drop all session caches so the next read refetches
    Sync,
}

fn app_dir(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| PathBuf::from(".")).join("ventureops")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ventureops=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let cache_file = app_dir(dirs::cache_dir()).join("session.json");
    let registry = CacheRegistry::new(Arc::new(FileStorage::new(cache_file)));
    let client = CachedClient::new(Client::from_env()?, &registry);

    match &cli.command {
        Commands::Companies(args) => commands::companies::run(args, &client, &format).await?,
        Commands::Funnel(args) => commands::funnel::run(args, &client, &format).await?,
        Commands::Coverage(args) => commands::coverage::run(args, &client, &format).await?,
        Commands::Pipeline(args) => commands::pipeline::run(args, &client, &format).await?,
        Commands::Assessment(args) => commands::assessment::run(args)?,
        Commands::Sync => commands::sync::run(&registry),
    }

    Ok(())
}
