use clap::Parser;
use exploration_core::{
    classifier::AnswerClassifier,
    config::{self, EngineConfig},
    graph::{ExplorationDict, StateGraph},
    rules::registry::InteractionRegistry,
    session::ExplorationEditingSession,
    warnings::{ExplorationWarnings, StateTopAnswersStats},
    Error, InternalResult,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Report authoring warnings for an exploration", long_about = None)]
struct Cli {
    /// Path to the exploration JSON
    exploration: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Learner top answer statistics (JSON)
    #[arg(short, long)]
    top_answers: Option<PathBuf>,

    /// Print warnings as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

/// Returns whether the exploration has critical warnings.
fn run(cli: &Cli) -> InternalResult<bool> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let dict: ExplorationDict = config::from_file(&cli.exploration)?;
    let param_changes = dict.param_changes.clone();
    let graph = StateGraph::from_dict(dict)
        .with_max_state_name_length(config.graph.max_state_name_length);
    let session = ExplorationEditingSession::new(graph, param_changes);
    debug!(states = session.graph().len(), "exploration loaded");

    let classifier = AnswerClassifier::new(config.classification, InteractionRegistry::builtin());
    let mut top_answers = match &cli.top_answers {
        Some(path) => Some(config::from_file::<StateTopAnswersStats, _>(path)?),
        None => None,
    };
    if let Some(top) = top_answers.as_mut() {
        top.refresh_addressed(session.graph(), &classifier);
    }

    let mut warnings = ExplorationWarnings::new(config.warnings, classifier);
    warnings.set_top_answers(top_answers);
    session.update_warnings(&mut warnings);

    if cli.json {
        let report = serde_json::json!({
            "warnings": warnings.get_warnings(),
            "stateWarnings": warnings.get_all_state_related_warnings(),
            "danglingDestinations": warnings.get_dangling_destinations(),
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| Error::Internal(format!("Failed to render report: {}", e)))?;
        println!("{}", text);
    } else {
        for warning in warnings.get_warnings() {
            println!("[{}] {}", warning.warning_type, warning.message);
        }
        for (state_name, messages) in warnings.get_all_state_related_warnings() {
            for message in messages {
                println!("  {}: {}", state_name, message);
            }
        }
        println!("{} warning(s)", warnings.count_warnings());
    }

    Ok(warnings.has_critical_warnings())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(false) => {}
        Ok(true) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
