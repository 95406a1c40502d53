use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gw_core::{ArticlePlan, BriefStatus, Store, TypedStore};
use gw_inference::{create_model, ModelConfig};
use gw_pipeline::{AnalyzeStage, DiscoverStage, GenerateStage, PipelineConfig, PlanStage};
use gw_scrape::{Fetcher, PageFetcher};
use gw_storage::{paths, FsStore};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gw", author, version, about = "Brand-aware blog article pipeline")]
struct Cli {
    /// Directory where per-domain artifacts are written
    #[arg(long, default_value = "./content")]
    output_dir: PathBuf,
    /// Generation backend. Available models: anthropic (default), dummy
    #[arg(long, default_value = "anthropic")]
    model: String,
    /// Override the concrete model name
    #[arg(long)]
    model_name: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a site's brand voice and write site-analysis.json
    Analyze { url: String },
    /// Inventory the site's existing articles
    Discover {
        url: String,
        /// Cap on candidate articles inspected per run
        #[arg(long, default_value_t = 20)]
        max_articles: usize,
    },
    /// Identify content gaps and plan article briefs
    Plan {
        url: String,
        /// Number of articles to plan
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Draft articles for briefs not yet generated
    Generate {
        url: String,
        /// Briefs to process this run
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Run analyze, discover, plan and generate in sequence
    Run {
        url: String,
        #[arg(long, default_value_t = 5)]
        plan_count: usize,
        #[arg(long, default_value_t = 3)]
        generate_count: usize,
    },
    /// Show which artifacts exist for a domain
    Status { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let store: Arc<dyn Store> = Arc::new(FsStore::new(&cli.output_dir));
    let generator = create_model(
        &cli.model,
        ModelConfig {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            model_name: cli.model_name.clone(),
        },
    )?;
    info!("🧠 Generator initialized (using {})", generator.name());

    let fetcher: Arc<dyn PageFetcher> = Arc::new(Fetcher::with_defaults()?);
    let mut config = PipelineConfig::from_env();

    match cli.command {
        Commands::Analyze { url } => {
            let stage = AnalyzeStage::new(store, generator, fetcher);
            let analysis = stage.run(&url).await?;
            info!("✨ Analyzed {} ({})", analysis.site_name, analysis.brand_voice.tone);
        }
        Commands::Discover { url, max_articles } => {
            config.max_articles = max_articles;
            let stage = DiscoverStage::new(store, fetcher, config);
            let inventory = stage.run(&url).await?;
            info!("✨ Discovered {} articles", inventory.article_count);
        }
        Commands::Plan { url, count } => {
            let stage = PlanStage::new(store, generator);
            let plan = stage.run(&url, count).await?;
            info!("✨ Planned {} briefs across {} gaps", plan.articles.len(), plan.gaps.len());
        }
        Commands::Generate { url, count } => {
            let stage = GenerateStage::new(store, generator);
            let articles = stage.run(&url, count).await?;
            info!("✨ Generated {} articles", articles.len());
        }
        Commands::Run {
            url,
            plan_count,
            generate_count,
        } => {
            AnalyzeStage::new(store.clone(), generator.clone(), fetcher.clone())
                .run(&url)
                .await?;
            DiscoverStage::new(store.clone(), fetcher, config)
                .run(&url)
                .await?;
            PlanStage::new(store.clone(), generator.clone())
                .run(&url, plan_count)
                .await?;
            let articles = GenerateStage::new(store, generator)
                .run(&url, generate_count)
                .await?;
            info!("✨ Pipeline complete: {} articles generated", articles.len());
        }
        Commands::Status { url } => {
            print_status(store.as_ref(), &url).await?;
        }
    }

    Ok(())
}

async fn print_status(store: &dyn Store, url: &str) -> anyhow::Result<()> {
    let domain = paths::domain_key(url)?;
    println!("Artifacts for {domain}:");
    let artifacts = [
        ("site-analysis.json", paths::site_analysis(&domain)),
        ("existing-articles.json", paths::existing_articles(&domain)),
        ("article-plan.json", paths::article_plan(&domain)),
        ("blog-plan.md", paths::blog_plan_md(&domain)),
    ];
    for (name, path) in artifacts {
        let present = if name.ends_with(".md") {
            store.read_text(&path).await?.is_some()
        } else {
            store.read_json(&path).await?.is_some()
        };
        println!("  {} {}", if present { "✅" } else { "⬜" }, name);
    }

    let plan: Option<ArticlePlan> =
        TypedStore::read(store, &paths::article_plan(&domain)).await?;
    if let Some(plan) = plan {
        let generated = plan
            .articles
            .iter()
            .filter(|b| b.status == BriefStatus::Generated)
            .count();
        println!("  {generated}/{} briefs generated", plan.articles.len());
    }
    Ok(())
}
