use crate::config::TelemetryConfig;
use tracing::Level;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level; everything else stays at warn.
const SERVICE_TARGETS: [&str; 2] = ["uae_flood", "uae_flood_api"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{directives}' from {origin}")]
    Filter {
        directives: String,
        origin: FilterOrigin,
        #[source]
        source: ParseError,
    },
    #[error("could not install the tracing subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Where the active filter directives came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    RustLog,
    AppLogLevel,
}

impl std::fmt::Display for FilterOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::RustLog => "RUST_LOG",
            Self::AppLogLevel => "APP_LOG_LEVEL",
        })
    }
}

#[derive(Debug)]
pub struct LogFilter {
    pub directives: String,
    pub origin: FilterOrigin,
    filter: EnvFilter,
}

impl LogFilter {
    /// A non-empty `RUST_LOG` is used verbatim. Otherwise a bare level such as
    /// `debug` is scoped to the service crates so HTTP client noise stays quiet.
    pub fn resolve(rust_log: Option<&str>, configured: &str) -> Result<Self, TelemetryError> {
        let (directives, origin) = match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => (value.to_string(), FilterOrigin::RustLog),
            None => (scoped_directives(configured), FilterOrigin::AppLogLevel),
        };

        let filter = EnvFilter::try_new(&directives).map_err(|source| TelemetryError::Filter {
            directives: directives.clone(),
            origin,
            source,
        })?;

        Ok(Self {
            directives,
            origin,
            filter,
        })
    }
}

fn scoped_directives(configured: &str) -> String {
    let configured = configured.trim();
    match configured.parse::<Level>() {
        Ok(level) => {
            let level = level.as_str().to_ascii_lowercase();
            let mut directives = vec!["warn".to_string()];
            directives.extend(
                SERVICE_TARGETS
                    .iter()
                    .map(|target| format!("{target}={level}")),
            );
            directives.join(",")
        }
        Err(_) => configured.to_string(),
    }
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let LogFilter {
        directives,
        origin,
        filter,
    } = LogFilter::resolve(rust_log.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)?;

    tracing::debug!(%origin, %directives, "log filter installed");
    Ok(())
}
