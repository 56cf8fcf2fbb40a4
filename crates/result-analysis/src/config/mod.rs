use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::results::{GradingConfiguration, GradingMethod, RankingPolicy};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub grading: GradingSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let config_path = env::var("RESULTS_GRADING_CONFIG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let method = match env::var("RESULTS_GRADING_METHOD") {
            Ok(value) => Some(
                GradingMethod::parse(&value).ok_or(ConfigError::InvalidGradingMethod(value))?,
            ),
            Err(_) => None,
        };

        let ranking = match env::var("RESULTS_RANKING_POLICY") {
            Ok(value) => Some(
                RankingPolicy::parse(&value).ok_or(ConfigError::InvalidRankingPolicy(value))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            grading: GradingSettings {
                config_path,
                method,
                ranking,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the grading configuration comes from and which overrides apply to it.
#[derive(Debug, Clone, Default)]
pub struct GradingSettings {
    pub config_path: Option<PathBuf>,
    pub method: Option<GradingMethod>,
    pub ranking: Option<RankingPolicy>,
}

impl GradingSettings {
    /// Build the grading configuration for a run: file (or defaults) plus overrides.
    pub fn resolve(&self) -> Result<GradingConfiguration, ConfigError> {
        let base = match &self.config_path {
            Some(path) => {
                let file = std::fs::File::open(path).map_err(|source| ConfigError::GradingFile {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_reader(file).map_err(|source| ConfigError::GradingFormat {
                    path: path.clone(),
                    source,
                })?
            }
            None => GradingConfiguration::default(),
        };

        let configured = match self.method {
            Some(method) => base.with_method(method),
            None => base,
        };

        Ok(match self.ranking {
            Some(policy) => configured.with_ranking(policy),
            None => configured,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidGradingMethod(String),
    InvalidRankingPolicy(String),
    GradingFile {
        path: PathBuf,
        source: std::io::Error,
    },
    GradingFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGradingMethod(value) => write!(
                f,
                "RESULTS_GRADING_METHOD must be 'points' or 'total_marks', got '{}'",
                value
            ),
            ConfigError::InvalidRankingPolicy(value) => write!(
                f,
                "RESULTS_RANKING_POLICY must be 'competition' or 'dense', got '{}'",
                value
            ),
            ConfigError::GradingFile { path, .. } => {
                write!(f, "unable to open grading configuration {}", path.display())
            }
            ConfigError::GradingFormat { path, .. } => {
                write!(f, "grading configuration {} is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidGradingMethod(_) | ConfigError::InvalidRankingPolicy(_) => None,
            ConfigError::GradingFile { source, .. } => Some(source),
            ConfigError::GradingFormat { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("RESULTS_GRADING_CONFIG");
        env::remove_var("RESULTS_GRADING_METHOD");
        env::remove_var("RESULTS_RANKING_POLICY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.grading.config_path.is_none());

        let grading = config.grading.resolve().expect("defaults resolve");
        assert_eq!(grading, GradingConfiguration::default());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RESULTS_GRADING_METHOD", "totalMarks");
        env::set_var("RESULTS_RANKING_POLICY", "dense");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        let grading = config.grading.resolve().expect("overrides resolve");
        assert_eq!(grading.method, GradingMethod::TotalMarks);
        assert_eq!(grading.ranking, RankingPolicy::Dense);
        assert_eq!(grading.version, 3);
    }

    #[test]
    fn rejects_unknown_grading_method() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RESULTS_GRADING_METHOD", "average");
        let err = AppConfig::load().expect_err("unknown method rejected");
        reset_env();

        assert!(matches!(err, ConfigError::InvalidGradingMethod(ref value) if value == "average"));
    }

    #[test]
    fn missing_grading_file_is_reported() {
        let settings = GradingSettings {
            config_path: Some(PathBuf::from("/nonexistent/grading.json")),
            ..GradingSettings::default()
        };

        let err = settings.resolve().expect_err("file missing");
        assert!(matches!(err, ConfigError::GradingFile { .. }));
    }
}
