//! Buzzeval command-line entrypoint.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use buzzeval::constants::{DEFAULT_LOG_FILE, DEFAULT_PREDICTIONS_PATH, DEFAULT_SCORES_PATH};
use buzzeval::{
    AgentRuntime, Corpus, CurveScorer, EvalConfig, EvalError, Evaluator, HttpAgentClient,
    WeightCurve, read_predictions, summary_json, write_predictions, write_scores,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Incremental quiz bowl evaluation harness
///
/// Reveals each question to an agent a few characters at a time, records every
/// guess and buzz, then scores the traces: end-of-question accuracy plus a curve
/// score that rewards buzzing early with the right answer.
///
/// Settings are read from BUZZEVAL_* environment variables; flags override them.
#[derive(Parser)]
#[command(name = "buzzeval")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Also write logs to this file (no colors)
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Only log to stderr
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the agent on every question and score the results
    Run(RunArgs),

    /// Rescore a saved predictions file without contacting any agent
    Score(ScoreArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Question corpus (JSON with a "questions" array)
    input: PathBuf,

    /// Where to write the guess traces
    #[arg(default_value = DEFAULT_PREDICTIONS_PATH)]
    predictions: PathBuf,

    /// Where to write the per-question scores
    #[arg(default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,

    /// Characters revealed between queries
    #[arg(long, alias = "char_step_size")]
    char_step_size: Option<usize>,

    /// Host the agent listens on
    #[arg(long)]
    hostname: Option<String>,

    /// Port the agent listens on
    #[arg(long)]
    port: Option<u16>,

    /// The agent is already running: do not spawn or stop it
    #[arg(long = "norun-web", alias = "skip-agent-bootstrap")]
    norun_web: bool,

    /// Seconds to sleep before starting
    #[arg(long)]
    wait: Option<u64>,

    /// Per-request timeout in seconds (default: wait forever)
    #[arg(long)]
    request_timeout: Option<u64>,

    /// Shell command that boots the agent
    #[arg(long)]
    agent_command: Option<String>,

    /// Stdout fragment that signals the agent is ready
    #[arg(long)]
    ready_marker: Option<String>,

    /// Weight curve artifact
    #[arg(long, alias = "curve-pkl")]
    curve_path: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, mut config: EvalConfig) -> EvalConfig {
        if let Some(step_size) = self.char_step_size {
            config.step_size = step_size;
        }
        if let Some(ref host) = self.hostname {
            config.agent_host = host.clone();
        }
        if let Some(port) = self.port {
            config.agent_port = port;
        }
        if self.norun_web {
            config.skip_agent_bootstrap = true;
        }
        if let Some(secs) = self.wait {
            config.startup_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(ref command) = self.agent_command {
            config.agent_command = command.clone();
        }
        if let Some(ref marker) = self.ready_marker {
            config.ready_marker = marker.clone();
        }
        if let Some(ref path) = self.curve_path {
            config.curve_path = path.clone();
        }
        config
    }
}

#[derive(Args)]
struct ScoreArgs {
    /// Question corpus the predictions were collected on
    input: PathBuf,

    /// Saved guess traces
    #[arg(default_value = DEFAULT_PREDICTIONS_PATH)]
    predictions: PathBuf,

    /// Where to write the per-question scores
    #[arg(default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,

    /// Weight curve artifact
    #[arg(long, alias = "curve-pkl")]
    curve_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = (!cli.no_log_file).then_some(cli.log_file.as_path());
    init_tracing(log_file)?;

    let result = match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Score(args) => score(args),
    };

    if let Err(ref e) = result {
        tracing::error!(kind = ?e.kind(), error = %e, "Evaluation failed");
    }
    result?;
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("buzzeval=info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

async fn run(args: RunArgs) -> Result<(), EvalError> {
    let config = args.apply(EvalConfig::from_env()?);
    config.validate()?;

    tracing::info!(
        agent = %config.agent_url(),
        step_size = config.step_size,
        bootstrap = !config.skip_agent_bootstrap,
        "Buzzeval starting"
    );

    let corpus = Corpus::load(&args.input)?;
    let client = HttpAgentClient::from_config(&config)?;
    let runtime = AgentRuntime::from_config(&config);
    let mut evaluator = Evaluator::new(client, runtime, &config);

    tracing::info!(questions = corpus.len(), "Collecting responses to questions");
    let collection = evaluator.collect(&corpus.questions).await?;
    tracing::info!(
        secs_per_question = collection.timing.mean_secs_per_question(),
        "Mean time per question"
    );

    // Persist the traces before the curve is touched.
    write_predictions(&args.predictions, &collection.results)?;

    tracing::info!("Computing curve score of results");
    let scorer = CurveScorer::new(WeightCurve::load(&config.curve_path)?);
    let scores = evaluator.score_results(&scorer, &corpus.questions, &collection.results)?;
    write_scores(&args.scores, &scores)?;

    println!("{}", summary_json(&scores.summary()?)?);
    Ok(())
}

fn score(args: ScoreArgs) -> Result<(), EvalError> {
    let mut config = EvalConfig::from_env()?;
    if let Some(path) = args.curve_path {
        config.curve_path = path;
    }
    config.validate_curve_path()?;

    let corpus = Corpus::load(&args.input)?;
    let results = read_predictions(&args.predictions)?;
    let scorer = CurveScorer::new(WeightCurve::load(&config.curve_path)?);

    let scores = scorer.score_corpus(&corpus.questions, &results)?;
    write_scores(&args.scores, &scores)?;

    let summary = scores.summary()?;
    tracing::info!(summary = %summary, "Rescored predictions");
    println!("{}", summary_json(&summary)?);
    Ok(())
}
