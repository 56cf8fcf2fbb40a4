use clap::Args;
use result_analysis::config::AppConfig;
use result_analysis::error::AppError;
use result_analysis::workflows::results::{GradingConfiguration, GradingMethod, RankingPolicy};
use result_analysis::workflows::scoresheet::{AnalysisBatch, ScoreSheetImporter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command-line overrides layered over the environment configuration.
#[derive(Args, Debug, Default)]
pub(crate) struct GradingOverrides {
    /// JSON grading configuration file (overrides RESULTS_GRADING_CONFIG)
    #[arg(long)]
    pub(crate) grading_config: Option<PathBuf>,
    /// Grading method: points or total-marks
    #[arg(long, value_parser = parse_method)]
    pub(crate) method: Option<GradingMethod>,
    /// Tie policy: competition (1, 1, 3) or dense (1, 1, 2)
    #[arg(long, value_parser = parse_ranking)]
    pub(crate) ranking: Option<RankingPolicy>,
}

pub(crate) fn effective_grading(
    config: &AppConfig,
    overrides: &GradingOverrides,
) -> Result<GradingConfiguration, AppError> {
    let mut settings = config.grading.clone();

    if let Some(path) = &overrides.grading_config {
        settings.config_path = Some(path.clone());
    }
    if let Some(method) = overrides.method {
        settings.method = Some(method);
    }
    if let Some(ranking) = overrides.ranking {
        settings.ranking = Some(ranking);
    }

    let grading = settings.resolve()?;
    grading.validate()?;
    debug!(
        version = grading.version,
        method = grading.method.label(),
        "grading configuration resolved"
    );
    Ok(grading)
}

pub(crate) fn load_batch(batch: &Path, scores: Option<&Path>) -> Result<AnalysisBatch, AppError> {
    let loaded = ScoreSheetImporter::batch_from_path(batch)?;

    Ok(match scores {
        Some(path) => loaded.with_scores(ScoreSheetImporter::scores_from_path(path)?),
        None => loaded,
    })
}

pub(crate) fn parse_method(raw: &str) -> Result<GradingMethod, String> {
    GradingMethod::parse(raw).ok_or_else(|| format!("unknown grading method '{raw}'"))
}

pub(crate) fn parse_ranking(raw: &str) -> Result<RankingPolicy, String> {
    RankingPolicy::parse(raw).ok_or_else(|| format!("unknown ranking policy '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use result_analysis::config::{AppEnvironment, GradingSettings, TelemetryConfig};

    fn app_config(grading: GradingSettings) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
            },
            grading,
        }
    }

    #[test]
    fn flags_override_environment_settings() {
        let config = app_config(GradingSettings {
            method: Some(GradingMethod::Points),
            ..GradingSettings::default()
        });
        let overrides = GradingOverrides {
            method: Some(GradingMethod::TotalMarks),
            ..GradingOverrides::default()
        };

        let grading = effective_grading(&config, &overrides).expect("grading resolves");

        assert_eq!(grading.method, GradingMethod::TotalMarks);
        assert_eq!(grading.ranking, RankingPolicy::Competition);
    }

    #[test]
    fn value_parsers_reject_unknown_names() {
        assert_eq!(parse_method("total-marks"), Ok(GradingMethod::TotalMarks));
        assert!(parse_method("median").is_err());
        assert_eq!(parse_ranking("dense"), Ok(RankingPolicy::Dense));
        assert!(parse_ranking("olympic").is_err());
    }

    #[test]
    fn missing_batch_file_is_an_import_error() {
        let err = load_batch(Path::new("/nonexistent/batch.json"), None)
            .expect_err("batch file missing");

        assert!(matches!(err, AppError::Import(_)));
    }
}
