use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use autoquiz_nlp::{
    quiz::QuizGenerator, AnnotatedParser, AutoQuizConfig, MemoryOntology, MemoryQuizStore,
    QuizTelemetry,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use shared_event_bus::FileEventPublisher;
use shared_logging::LogLevel;

const DEFAULT_CONFIG: &str = "autoquiz.toml";

#[derive(Parser, Debug)]
#[command(name = "aq", version, about = "Comprehension quiz generator")]
struct Cli {
    /// Configuration file; `autoquiz.toml` is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `paths.store`.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Overrides `paths.ontology`.
    #[arg(long, global = true)]
    ontology: Option<PathBuf>,
    /// Overrides `telemetry.log_path`.
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// Overrides `telemetry.event_log`.
    #[arg(long, global = true)]
    event_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stores annotated passages as paragraphs of a keyword's quiz.
    Ingest {
        #[arg(long)]
        keyword: String,
        /// Annotation file; defaults to `paths.annotations`.
        #[arg(long)]
        annotations: Option<PathBuf>,
        #[arg(long, default_value = "annotations")]
        source: String,
    },
    /// Generates questions for a keyword and prints the run report.
    Generate {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        seed: Option<u64>,
        /// Annotation file the parser answers from.
        #[arg(long)]
        annotations: Option<PathBuf>,
    },
    /// Lists stored questions for a keyword.
    Questions {
        #[arg(long)]
        keyword: String,
    },
    /// Lists known keywords.
    Keywords,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Ingest {
            keyword,
            annotations,
            source,
        } => handle_ingest(&config, &keyword, annotations, &source),
        Commands::Generate {
            keyword,
            seed,
            annotations,
        } => handle_generate(config, &keyword, seed, annotations),
        Commands::Questions { keyword } => {
            let store = open_store(&config)?;
            for question in store.questions_for(&keyword)? {
                println!(
                    "{} | type {} | {} | {}",
                    question.id, question.q_type, question.answer, question.text
                );
            }
            Ok(())
        }
        Commands::Keywords => {
            let store = open_store(&config)?;
            for keyword in store.keywords() {
                println!("{keyword}");
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<AutoQuizConfig> {
    let mut config = match &cli.config {
        Some(path) => AutoQuizConfig::load(path)?,
        None if PathBuf::from(DEFAULT_CONFIG).exists() => AutoQuizConfig::load(DEFAULT_CONFIG)?,
        None => AutoQuizConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.paths.store.clone_from(store);
    }
    if let Some(ontology) = &cli.ontology {
        config.paths.ontology.clone_from(ontology);
    }
    if let Some(log_path) = &cli.log_path {
        config.telemetry.log_path = Some(log_path.clone());
    }
    if let Some(event_log) = &cli.event_log {
        config.telemetry.event_log = Some(event_log.clone());
    }
    Ok(config)
}

fn open_store(config: &AutoQuizConfig) -> Result<MemoryQuizStore> {
    MemoryQuizStore::open(&config.paths.store)
        .with_context(|| format!("opening quiz store {}", config.paths.store.display()))
}

fn load_parser(config: &AutoQuizConfig, annotations: Option<PathBuf>) -> Result<AnnotatedParser> {
    let path = annotations.unwrap_or_else(|| config.paths.annotations.clone());
    AnnotatedParser::load(&path).with_context(|| format!("loading annotations {}", path.display()))
}

fn build_telemetry(config: &AutoQuizConfig) -> Result<QuizTelemetry> {
    let mut builder = QuizTelemetry::builder("aq").min_level(config.telemetry.min_level);
    if let Some(path) = &config.telemetry.log_path {
        builder = builder.log_path(path);
    }
    if let Some(path) = &config.telemetry.event_log {
        let publisher = FileEventPublisher::new(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        builder = builder.event_publisher(Arc::new(publisher));
    }
    builder.build()
}

fn handle_ingest(
    config: &AutoQuizConfig,
    keyword: &str,
    annotations: Option<PathBuf>,
    source: &str,
) -> Result<()> {
    anyhow::ensure!(!keyword.trim().is_empty(), "keyword cannot be empty");
    let parser = load_parser(config, annotations)?;
    let store = open_store(config)?;
    let texts: Vec<String> = parser
        .passages()
        .iter()
        .map(|passage| passage.text.clone())
        .collect();
    let quiz_id = store.create_quiz(keyword, source, texts.iter().cloned());
    store
        .save(&config.paths.store)
        .with_context(|| format!("saving quiz store {}", config.paths.store.display()))?;

    let telemetry = build_telemetry(config)?;
    let _ = telemetry.log(
        LogLevel::Info,
        "quiz.ingested",
        json!({ "keyword": keyword, "quiz_id": quiz_id, "paragraphs": texts.len() }),
    );
    println!("quiz {quiz_id}: stored {} paragraph(s) under {keyword:?}", texts.len());
    Ok(())
}

fn handle_generate(
    mut config: AutoQuizConfig,
    keyword: &str,
    seed: Option<u64>,
    annotations: Option<PathBuf>,
) -> Result<()> {
    if seed.is_some() {
        config.engine.seed = seed;
    }
    let parser = load_parser(&config, annotations)?;
    let ontology = MemoryOntology::load(&config.paths.ontology)
        .with_context(|| format!("loading ontology {}", config.paths.ontology.display()))?;
    let store = open_store(&config)?;
    let telemetry = build_telemetry(&config)?;

    let mut generator = QuizGenerator::builder()
        .parser(Arc::new(parser))
        .ontology(Arc::new(ontology))
        .store(Arc::new(store.clone()))
        .telemetry(telemetry)
        .config(&config)
        .build()?;
    let report = generator.generate_quiz(keyword)?;
    store
        .save(&config.paths.store)
        .with_context(|| format!("saving quiz store {}", config.paths.store.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
