use crate::infra::{effective_grading, load_batch, GradingOverrides};
use crate::report::{render_json, render_table, OutputFormat};
use clap::{Args, Parser, Subcommand};
use result_analysis::config::AppConfig;
use result_analysis::error::AppError;
use result_analysis::telemetry;
use result_analysis::workflows::results::ResultAnalyzer;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "result-analysis",
    about = "Grade, total, and rank examination results for a class",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a batch of scores and print the ranked results
    Analyze(AnalyzeArgs),
    /// Print the effective grading configuration as JSON
    Grading(GradingArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON batch file with `students`, `subjects`, and optional `scores`
    #[arg(long)]
    pub(crate) batch: PathBuf,
    /// CSV score sheet (`student_id,subject_id,mark`) replacing the batch scores
    #[arg(long)]
    pub(crate) scores: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) grading: GradingOverrides,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Include per-subject and class summaries for each form
    #[arg(long)]
    pub(crate) summary: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GradingArgs {
    #[command(flatten)]
    pub(crate) grading: GradingOverrides,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Analyze(args) => run_analyze(&config, args),
        Command::Grading(args) => {
            let grading = effective_grading(&config, &args.grading)?;
            println!("{}", serde_json::to_string_pretty(&grading)?);
            Ok(())
        }
    }
}

fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<(), AppError> {
    let grading = effective_grading(config, &args.grading)?;
    let batch = load_batch(&args.batch, args.scores.as_deref())?;

    let analyzer = ResultAnalyzer::new(grading);
    let run = analyzer.analyze(&batch.scores, &batch.students, &batch.subjects)?;

    info!(
        environment = ?config.environment,
        students = batch.students.len(),
        analyzed = run.results.len(),
        rejected = run.rejected.len(),
        "analysis finished"
    );

    let summaries = args.summary.then(|| run.summaries(analyzer.config()));
    match args.format {
        OutputFormat::Table => render_table(&run, summaries.as_deref(), analyzer.config()),
        OutputFormat::Json => render_json(&run, summaries.as_deref(), analyzer.config())?,
    }

    Ok(())
}
