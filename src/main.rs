use anyhow::Context;
use clap::{Parser, Subcommand};
use pdp_builder::app::batch_use_case::{BatchUseCase, RecordOutcome, RunSummary};
use pdp_builder::config::{Config, Settings, ENV_API_BASE_URL};
use pdp_builder::constants::{self, FILTER_FIELDS};
use pdp_builder::infra::file_sink::FileDocumentSink;
use pdp_builder::infra::http_client::build_client;
use pdp_builder::infra::local_source::{LocalFileStore, LocalProductDump};
use pdp_builder::infra::product_api::{products_url, ProductApi};
use pdp_builder::infra::webdav_store::WebDavStore;
use pdp_builder::pipeline::normalize::analysis::AnalysisPolicy;
use pdp_builder::pipeline::query::ProductFilter;
use pdp_builder::{logging, metrics};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pdp_builder")]
#[command(about = "Builds product detail page JSON documents")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the ingredient dictionary, query the product API and write one document per product
    Run {
        /// TOML file with run settings
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Overrides the output directory from the settings
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the product filter (and request URL when the API base URL is set)
    Filter,
    /// Build documents from a saved product API response and a local dictionary
    Normalize {
        /// Saved `/products` response body, or a bare array of records
        #[arg(long)]
        records: PathBuf,
        /// Local copy of ingredients.json
        #[arg(long)]
        dictionary: PathBuf,
        #[arg(long, default_value = constants::DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Fail on guaranteed analysis fragments without a closing parenthesis
        #[arg(long)]
        strict: bool,
    },
}

fn load_settings(path: Option<PathBuf>, output_dir: Option<PathBuf>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    if let Some(dir) = output_dir {
        settings.output_dir = dir;
    }
    Ok(settings)
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Run {}:", summary.run_id);
    println!("   Products returned: {}", summary.products_returned);
    println!("   Written: {}", summary.written());
    println!("   Failed: {}", summary.failed());
    println!("   Missing ingredients: {}", summary.missing_ingredients);
    println!("   AAFCO statements without \"is formulated\": {}", summary.aafco_no_match);
    println!("   Skipped analysis fragments: {}", summary.skipped_analysis_fragments);

    let failures: Vec<&RecordOutcome> = summary.outcomes.iter().filter(|o| !o.is_written()).collect();
    if !failures.is_empty() {
        println!("\n⚠️  Write failures:");
        for failure in failures {
            if let RecordOutcome::Failed { product_id, reason } = failure {
                println!("   - {}: {}", product_id.as_deref().unwrap_or("<no UPC>"), reason);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();
    let product_ids = constants::product_ids().context("products.json is not a list of strings")?;

    match cli.command {
        Commands::Run { settings, output_dir } => {
            let settings = load_settings(settings, output_dir)?;
            let config = Config::from_env()?;
            info!("Writing documents to {}", settings.output_dir.display());

            let client = build_client(settings.request_timeout())?;
            let use_case = BatchUseCase::new(
                Box::new(WebDavStore::new(client.clone(), &config)),
                Box::new(ProductApi::new(client, &config)),
                Box::new(FileDocumentSink::new(&settings.output_dir)),
            )
            .with_dictionary_path(settings.dictionary_path.clone())
            .with_analysis_policy(settings.analysis_policy());

            let summary = use_case.run(&product_ids).await?;
            print_summary(&summary);
        }
        Commands::Filter => {
            dotenv::dotenv().ok();
            let filter = ProductFilter::any_field_matches(FILTER_FIELDS, &product_ids);
            println!("{filter}");
            if let Ok(base) = std::env::var(ENV_API_BASE_URL) {
                let url = reqwest::Url::parse_with_params(&products_url(&base), &[("filter", filter.to_string())])
                    .with_context(|| format!("{ENV_API_BASE_URL} is not a valid URL"))?;
                println!("{url}");
            }
        }
        Commands::Normalize {
            records,
            dictionary,
            output_dir,
            strict,
        } => {
            let policy = if strict { AnalysisPolicy::Strict } else { AnalysisPolicy::Lenient };
            let use_case = BatchUseCase::new(
                Box::new(LocalFileStore),
                Box::new(LocalProductDump::new(records)),
                Box::new(FileDocumentSink::new(output_dir)),
            )
            .with_dictionary_path(dictionary.display().to_string())
            .with_analysis_policy(policy);

            let summary = use_case.run(&product_ids).await?;
            print_summary(&summary);
        }
    }

    Ok(())
}
