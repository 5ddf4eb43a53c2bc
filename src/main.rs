mod ai;
mod config;
mod core;
mod db;
mod engine;
mod ocr;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::ai::{AiAnalyzer, HeuristicAnalyzer, OpenAiClient};
use crate::config::Config;
use crate::core::pipeline::AnalysisPipeline;
use crate::db::SharedDatabase;
use crate::ocr::{AzureReadClient, NoopExtractor, TextExtractor};

#[derive(Parser)]
#[command(name = "jobradar", version, about = "Job-posting fraud scanner")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a job posting for fraud indicators.
    Analyze {
        /// Job description text. Reads stdin when omitted and no --file is given.
        text: Option<String>,
        /// Read the job description from a file instead.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Screenshot or scan of the posting to run through OCR.
        #[arg(long)]
        image: Option<PathBuf>,
        /// Pretty-print the JSON result.
        #[arg(long)]
        pretty: bool,
    },
    /// List past analyses, newest first.
    History {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show a stored analysis by id.
    Show { id: i64 },
    /// Delete a stored analysis by id.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("jobradar=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config);

    // Open analysis history database
    let db_path = Path::new(&config.database.path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create database directory");
    }
    let db = SharedDatabase::open(db_path).expect("Failed to open analysis database");
    tracing::info!("Analysis database opened at {}", config.database.path);

    let owner = config.database.owner.clone();

    match cli.command {
        Command::Analyze {
            text,
            file,
            image,
            pretty,
        } => {
            let job_text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => {
                    std::fs::read_to_string(&path).expect("Failed to read job text file")
                }
                (None, None) => {
                    use std::io::Read;
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .expect("Failed to read job text from stdin");
                    buf
                }
            };

            let ai: Box<dyn AiAnalyzer> = match &config.ai.api_key {
                Some(key) => Box::new(OpenAiClient::new(&config.ai, key.clone())),
                None => {
                    tracing::info!("No AI API key configured, using heuristic analyzer");
                    Box::new(HeuristicAnalyzer)
                }
            };
            let ocr: Box<dyn TextExtractor> = match (&config.ocr.endpoint, &config.ocr.api_key) {
                (Some(endpoint), Some(key)) => Box::new(AzureReadClient::new(
                    &config.ocr,
                    endpoint.clone(),
                    key.clone(),
                )),
                _ => Box::new(NoopExtractor),
            };

            let pipeline = AnalysisPipeline::new(ai, ocr, Some(db));
            let outcome = pipeline
                .analyze_submission(&owner, &job_text, image.as_deref())
                .await;

            if image.is_some() {
                tracing::info!("Included {} chars of OCR text", outcome.extracted_text_len);
            }
            match outcome.record_id {
                Some(id) => tracing::info!("Saved as analysis #{id}"),
                None => tracing::warn!("Analysis was not persisted"),
            }

            let result = &outcome.report.result;
            let json = if pretty {
                serde_json::to_string_pretty(result)
            } else {
                serde_json::to_string(result)
            }
            .expect("Failed to serialize result");
            println!("{json}");
        }
        Command::History { page, limit } => {
            let (records, pagination) = db
                .list_analyses(&owner, page, limit)
                .expect("Failed to list analyses");
            for record in &records {
                println!(
                    "#{:<6} {:>3}  {:<14} {}",
                    record.id, record.score, record.status, record.created_at
                );
            }
            println!(
                "page {}/{} ({} total)",
                pagination.page,
                pagination.pages.max(1),
                pagination.total
            );
        }
        Command::Show { id } => {
            match db.get_analysis(&owner, id).expect("Failed to load analysis") {
                Some(record) => println!(
                    "{}",
                    serde_json::to_string_pretty(&record).expect("Failed to serialize record")
                ),
                None => println!("Analysis {id} not found"),
            }
        }
        Command::Delete { id } => {
            if db
                .delete_analysis(&owner, id)
                .expect("Failed to delete analysis")
            {
                println!("Analysis {id} deleted");
            } else {
                println!("Analysis {id} not found");
            }
        }
    }
}
