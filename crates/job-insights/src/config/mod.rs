use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data: DataConfig,
    pub report: ReportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let input_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DataConfig::DEFAULT_INPUT));
        let chart_dir = env::var("APP_CHART_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(ReportConfig::DEFAULT_CHART_DIR));

        let raw_preview = env::var("APP_PREVIEW_ROWS").unwrap_or_else(|_| "20".to_string());
        let preview_rows = raw_preview
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|rows| *rows > 0)
            .ok_or(ConfigError::InvalidPreviewRows { value: raw_preview })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data: DataConfig { input_path },
            report: ReportConfig {
                chart_dir,
                preview_rows,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the job listings export.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub input_path: PathBuf,
}

impl DataConfig {
    pub const DEFAULT_INPUT: &'static str = "data/Wuzzuf_Jobs.csv";
}

/// Where charts land and how much tabular output is printed.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub chart_dir: PathBuf,
    pub preview_rows: usize,
}

impl ReportConfig {
    pub const DEFAULT_CHART_DIR: &'static str = "charts";
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPreviewRows { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPreviewRows { value } => write!(
                f,
                "APP_PREVIEW_ROWS must be a positive integer (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
