use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub classifier: ClassifierConfig,
    pub insights: InsightConfig,
    pub accounts: AccountConfig,
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

        let model_path = env::var("LOAN_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(ClassifierConfig::DEFAULT_MODEL_PATH));

        let otp_ttl_minutes = env::var("OTP_TTL_MINUTES")
            .unwrap_or_else(|_| AccountConfig::DEFAULT_OTP_TTL_MINUTES.to_string())
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidOtpTtl)?;

        let trend_window_days = env::var("TREND_WINDOW_DAYS")
            .unwrap_or_else(|_| InsightConfig::DEFAULT_TREND_WINDOW_DAYS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidTrendWindow)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            classifier: ClassifierConfig { model_path },
            insights: InsightConfig { trend_window_days },
            accounts: AccountConfig { otp_ttl_minutes },
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the pre-trained classifier artifact.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
}

impl ClassifierConfig {
    pub const DEFAULT_MODEL_PATH: &'static str = "models/loan_classifier.json";
}

/// Defaults for the analytics views.
#[derive(Debug, Clone, Copy)]
pub struct InsightConfig {
    pub trend_window_days: u32,
}

impl InsightConfig {
    pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 180;
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            trend_window_days: Self::DEFAULT_TREND_WINDOW_DAYS,
        }
    }
}

/// One-time passcode settings for registration and login.
#[derive(Debug, Clone, Copy)]
pub struct AccountConfig {
    pub otp_ttl_minutes: u32,
}

impl AccountConfig {
    pub const DEFAULT_OTP_TTL_MINUTES: u32 = 10;
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            otp_ttl_minutes: Self::DEFAULT_OTP_TTL_MINUTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidOtpTtl,
    InvalidTrendWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidOtpTtl => {
                write!(f, "OTP_TTL_MINUTES must be a positive whole number")
            }
            ConfigError::InvalidTrendWindow => {
                write!(f, "TREND_WINDOW_DAYS must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidOtpTtl
            | ConfigError::InvalidTrendWindow => None,
        }
    }
}
