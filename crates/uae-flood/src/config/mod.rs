use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

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
    pub weather: WeatherConfig,
    pub decision: DecisionBackendConfig,
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

        let weather = WeatherConfig {
            api_key: non_empty_var("WEATHER_API_KEY"),
            base_url: non_empty_var("WEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
            timeout: seconds_var("WEATHER_TIMEOUT_SECS", 10)?,
            refresh_interval: seconds_var("WEATHER_REFRESH_SECS", 600)?,
            demo_seed: optional_number_var("WEATHER_DEMO_SEED")?,
        };

        let decision = DecisionBackendConfig {
            url: non_empty_var("DECISION_BACKEND_URL"),
            timeout: seconds_var("DECISION_TIMEOUT_SECS", 15)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            weather,
            decision,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn optional_number_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    non_empty_var(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { var: name })
        })
        .transpose()
}

/// Whole seconds; zero is rejected since intervals and timeouts must elapse.
fn seconds_var(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match optional_number_var::<u64>(name)?.unwrap_or(default) {
        0 => Err(ConfigError::ZeroDuration { var: name }),
        secs => Ok(Duration::from_secs(secs)),
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

/// Weather provider selection. No API key means the demo generator is used.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub refresh_interval: Duration,
    pub demo_seed: Option<u64>,
}

impl WeatherConfig {
    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            refresh_interval: Duration::from_secs(600),
            demo_seed: None,
        }
    }
}

/// Remote seeding decision service.
#[derive(Debug, Clone)]
pub struct DecisionBackendConfig {
    pub url: Option<String>,
    pub timeout: Duration,
}

impl Default for DecisionBackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
    ZeroDuration { var: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => {
                write!(f, "{var} must be a non-negative integer")
            }
            ConfigError::ZeroDuration { var } => write!(f, "{var} must be at least 1 second"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::ZeroDuration { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
