use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::evaluator::EvaluatorConfig;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the grader service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
    pub evaluator: EvaluatorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let threshold = env::var("SCREENING_THRESHOLD")
            .unwrap_or_else(|_| ScreeningConfig::DEFAULT_THRESHOLD.to_string())
            .parse::<u16>()
            .ok()
            .filter(|value| *value <= 100)
            .ok_or(ConfigError::InvalidThreshold)?;

        let summary_limit = env::var("SCREENING_SUMMARY_LIMIT")
            .unwrap_or_else(|_| ScreeningConfig::DEFAULT_SUMMARY_LIMIT.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidSummaryLimit)?;

        // Comma separated; an empty value disables the journal bonus.
        let evaluator = match env::var("HIGH_IMPACT_JOURNALS") {
            Ok(raw) => EvaluatorConfig {
                high_impact_journals: raw
                    .split(',')
                    .map(str::trim)
                    .filter(|venue| !venue.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            Err(_) => EvaluatorConfig::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningConfig {
                threshold,
                summary_limit,
            },
            evaluator,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Cutoffs applied when screening a batch of articles for publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub threshold: u16,
    pub summary_limit: usize,
}

impl ScreeningConfig {
    pub const DEFAULT_THRESHOLD: u16 = 70;
    pub const DEFAULT_SUMMARY_LIMIT: usize = 3;
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            summary_limit: Self::DEFAULT_SUMMARY_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold,
    InvalidSummaryLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold => {
                write!(f, "SCREENING_THRESHOLD must be an integer between 0 and 100")
            }
            ConfigError::InvalidSummaryLimit => {
                write!(f, "SCREENING_SUMMARY_LIMIT must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold
            | ConfigError::InvalidSummaryLimit => None,
        }
    }
}
