use chrono::{DateTime, Utc};
use clap::ValueEnum;
use result_analysis::error::AppError;
use result_analysis::workflows::results::{
    AnalysisRun, AnalyzedResult, FormSummary, GradeCount, GradingConfiguration, GradingMethod,
    RankingPolicy, RejectedEntry, StudentId,
};
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    config_version: u32,
    method: GradingMethod,
    ranking: RankingPolicy,
    results: &'a [AnalyzedResult],
    rejected: &'a [RejectedEntry],
    excluded_students: &'a [StudentId],
    #[serde(skip_serializing_if = "Option::is_none")]
    summaries: Option<&'a [FormSummary]>,
}

impl<'a> ReportEnvelope<'a> {
    fn new(
        run: &'a AnalysisRun,
        summaries: Option<&'a [FormSummary]>,
        config: &GradingConfiguration,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            config_version: config.version,
            method: config.method,
            ranking: config.ranking,
            results: &run.results,
            rejected: &run.rejected,
            excluded_students: &run.excluded_students,
            summaries,
        }
    }
}

pub(crate) fn render_json(
    run: &AnalysisRun,
    summaries: Option<&[FormSummary]>,
    config: &GradingConfiguration,
) -> Result<(), AppError> {
    let envelope = ReportEnvelope::new(run, summaries, config, Utc::now());
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub(crate) fn render_table(
    run: &AnalysisRun,
    summaries: Option<&[FormSummary]>,
    config: &GradingConfiguration,
) {
    println!(
        "Class results (grading v{}, ranked by {}, {:?} ties)",
        config.version,
        config.method.label(),
        config.ranking
    );

    if run.results.is_empty() {
        println!("\nNo students analyzed");
    } else {
        println!(
            "\n{:>4} {:>6} {:<8} {:<24} {:<10} {:>7} {:>6} {:<5}",
            "Pos", "Strm", "Adm", "Name", "Stream", "Marks", "Points", "Grade"
        );
        for result in ranked(&run.results) {
            println!(
                "{:>4} {:>6} {:<8} {:<24} {:<10} {:>7} {:>6} {:<5}",
                rank_label(result.overall_rank),
                rank_label(result.stream_rank),
                result.admission_number,
                result.name,
                result.stream.as_deref().unwrap_or("-"),
                format_mark(result.total_marks),
                result.total_points,
                result.overall_grade
            );
            println!("     {}", subject_line(result));
        }
    }

    if run.rejected.is_empty() {
        println!("\nRejected entries: none");
    } else {
        println!("\nRejected entries");
        for rejected in &run.rejected {
            println!("- {}: {}", rejected.student_id, rejected.issue);
        }
    }

    for form in summaries.unwrap_or_default() {
        render_summary(form);
    }
}

fn render_summary(form: &FormSummary) {
    let summary = &form.summary;
    println!(
        "\n{} summary: {} students, mean marks {}, mean points {}",
        form.form,
        summary.students,
        format_mark(summary.mean_total_marks),
        format_mark(summary.mean_total_points)
    );
    println!("Overall grades: {}", distribution_line(&summary.overall_distribution));

    println!("\nSubjects");
    for subject in &summary.subjects {
        println!(
            "- {} ({} graded): mean {} ({}), {}",
            subject.subject,
            subject.graded,
            format_mark(subject.mean_mark),
            subject.mean_grade,
            distribution_line(&subject.distribution)
        );
    }
}

// Form first so each form's ranking reads top to bottom.
fn ranked(results: &[AnalyzedResult]) -> Vec<&AnalyzedResult> {
    let mut ordered: Vec<&AnalyzedResult> = results.iter().collect();
    ordered.sort_by(|left, right| {
        left.form
            .cmp(&right.form)
            .then_with(|| left.overall_rank.cmp(&right.overall_rank))
            .then_with(|| left.admission_number.cmp(&right.admission_number))
    });
    ordered
}

fn subject_line(result: &AnalyzedResult) -> String {
    result
        .subjects
        .iter()
        .map(|subject| {
            if subject.missing {
                format!("{} --", subject.subject)
            } else {
                format!("{} {} {}", subject.subject, format_mark(subject.mark), subject.grade)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn distribution_line(distribution: &[GradeCount]) -> String {
    distribution
        .iter()
        .filter(|bucket| bucket.count > 0)
        .map(|bucket| format!("{}={}", bucket.grade, bucket.count))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rank_label(rank: Option<u32>) -> String {
    rank.map(|rank| rank.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_mark(value: f64) -> String {
    let rounded = format!("{value:.2}");
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
