use clap::Parser;
use seiri::manifest::gemini::{DEFAULT_MODEL, GeminiClassifier, GeminiConfig};
use seiri::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Normalize an automation-platform node library into per-node JSON artifacts
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the node library JSON file
    #[arg(default_value = "raw/n8n_nodes_library.json")]
    source: PathBuf,

    /// Directory receiving one JSON file per node
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// File receiving the array of all normalized nodes
    #[arg(short, long, default_value = "n8n_nodes_master.json")]
    aggregate: PathBuf,

    /// Keep existing files in the output directory instead of clearing it first
    #[arg(long)]
    keep_existing: bool,

    /// Ask the classification model for an IDS manifest per node
    #[arg(short, long)]
    enrich: bool,

    /// API key for the classification model
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for classification
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Seconds to wait after each successful classification call
    #[arg(long, default_value_t = 4)]
    pacing_secs: u64,

    /// Parameters included in each classification request
    #[arg(long, default_value_t = 15)]
    max_prompt_parameters: usize,
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    let config = RunConfig::new(&cli.source)
        .with_output_dir(&cli.output_dir)
        .with_aggregate_path(&cli.aggregate)
        .with_clear_output(!cli.keep_existing)
        .with_pacing(Duration::from_secs(cli.pacing_secs))
        .with_max_prompt_parameters(cli.max_prompt_parameters);

    let mut pipeline = Pipeline::new(config);
    if cli.enrich {
        let gemini = GeminiConfig {
            api_key: cli.api_key.clone().unwrap_or_default(),
            model: cli.model.clone(),
            ..GeminiConfig::default()
        };
        let classifier = GeminiClassifier::new(gemini).unwrap_or_else(|e| {
            exit_with_error(&format!("Cannot enable enrichment: {}", e))
        });
        pipeline = pipeline.with_classifier(Box::new(classifier));
    }

    println!("Loading node library from: {}", cli.source.display());
    let summary = pipeline
        .run()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    if summary.discovered == 0 {
        println!("\nNo nodes were found in the source file.");
        return;
    }

    println!("\n--- Run Summary ---");
    println!("Nodes discovered:     {}", summary.discovered);
    println!("Files written:        {}", summary.written);
    println!("Nodes skipped:        {}", summary.failed);
    if cli.enrich {
        println!("Manifests attached:   {}", summary.enriched);
    }
    println!("Output directory:     {}", cli.output_dir.display());
    if let Some(aggregate) = &summary.aggregate {
        println!("Aggregate file:       {}", aggregate.display());
    }
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
