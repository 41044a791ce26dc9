//! Client for the remote seeding decision service.

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{DecisionBackend, ProviderError};
use crate::config::DecisionBackendConfig;
use crate::engine::{RiskAssessment, SeedingDecision, SiteConditions};

const SERVICE: &str = "decision backend";
const DEFAULT_REASONING: &str = "Remote analysis complete";

/// Conditions sent to the decision service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub rainfall: f64,
    pub drainage_capacity: f64,
    pub soil_moisture: f64,
    pub cloud_cover: f64,
    pub humidity: f64,
    pub temperature: f64,
}

impl From<&SiteConditions> for DecisionRequest {
    fn from(site: &SiteConditions) -> Self {
        Self {
            rainfall: site.snapshot.rainfall_mm,
            drainage_capacity: site.location.drainage_capacity,
            soil_moisture: site.location.soil_moisture,
            cloud_cover: site.snapshot.cloud_cover,
            humidity: site.snapshot.humidity,
            temperature: site.snapshot.temperature_c,
        }
    }
}

/// Wire shape of the service response before validation.
#[derive(Debug, Deserialize)]
struct DecisionResponse {
    decision: String,
    confidence: f64,
    flood_probability: f64,
    #[serde(default)]
    reasoning: Option<Vec<String>>,
}

/// A validated remote verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDecision {
    pub decision: SeedingDecision,
    pub confidence: u8,
    pub flood_probability: f64,
    pub reasoning: Vec<String>,
}

impl RemoteDecision {
    pub fn risk(&self) -> RiskAssessment {
        RiskAssessment::remote(self.flood_probability)
    }
}

impl TryFrom<DecisionResponse> for RemoteDecision {
    type Error = ProviderError;

    fn try_from(response: DecisionResponse) -> Result<Self, Self::Error> {
        let malformed = |reason: String| ProviderError::Malformed {
            service: SERVICE,
            reason,
        };

        let decision = SeedingDecision::from_label(&response.decision)
            .ok_or_else(|| malformed(format!("unknown decision '{}'", response.decision)))?;

        if !(0.0..=100.0).contains(&response.confidence) {
            return Err(malformed(format!(
                "confidence {} outside 0-100",
                response.confidence
            )));
        }
        if !(0.0..=100.0).contains(&response.flood_probability) {
            return Err(malformed(format!(
                "flood probability {} outside 0-100",
                response.flood_probability
            )));
        }

        let reasoning = match response.reasoning {
            Some(reasons) if !reasons.is_empty() => reasons,
            _ => vec![DEFAULT_REASONING.to_string()],
        };

        Ok(Self {
            decision,
            confidence: response.confidence.round() as u8,
            flood_probability: response.flood_probability,
            reasoning,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DecisionServiceClient {
    client: Client,
    endpoint: Option<String>,
}

impl DecisionServiceClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// A client with no endpoint is valid; every call then reports `NotConfigured`.
    pub fn from_config(config: &DecisionBackendConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
        })
    }

    pub async fn request(
        &self,
        request: &DecisionRequest,
    ) -> Result<RemoteDecision, ProviderError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ProviderError::NotConfigured { service: SERVICE })?;

        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body: DecisionResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Malformed {
                    service: SERVICE,
                    reason: err.to_string(),
                })?;

        RemoteDecision::try_from(body)
    }
}

impl DecisionBackend for DecisionServiceClient {
    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn analyze(
        &self,
        request: &DecisionRequest,
    ) -> impl Future<Output = Result<RemoteDecision, ProviderError>> + Send {
        self.request(request)
    }
}
