//! OpenWeatherMap current-conditions client.

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, SnapshotOrigin, WeatherProvider};
use crate::config::WeatherConfig;
use crate::engine::{CloudCategory, Location, WeatherSnapshot};

const SERVICE: &str = "weather provider";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap response for current weather, trimmed to what a snapshot needs.
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    weather: Vec<OwmWeather>,
    main: OwmMain,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    #[serde(default)]
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    #[serde(default)]
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl OpenWeatherClient {
    /// Builds a client with the configured request timeout. `None` when no API key is set.
    pub fn from_config(config: &WeatherConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }))
    }

    pub async fn current(&self, location: &Location) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/weather", self.base_url);
        let lat = location.coordinates.lat.to_string();
        let lon = location.coordinates.lng.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
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

        let data: OwmCurrentResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Malformed {
                    service: SERVICE,
                    reason: err.to_string(),
                })?;

        Ok(convert_current_response(data))
    }
}

fn convert_current_response(data: OwmCurrentResponse) -> WeatherSnapshot {
    let description = data
        .weather
        .first()
        .map(|weather| weather.description.as_str())
        .unwrap_or_default();

    let rainfall_mm = data
        .rain
        .as_ref()
        .and_then(|rain| rain.one_hour.or(rain.three_hour))
        .unwrap_or(0.0);

    WeatherSnapshot {
        cloud_cover: data.clouds.map(|clouds| clouds.all).unwrap_or(0.0),
        cloud_category: CloudCategory::from_description(description),
        rainfall_mm,
        humidity: data.main.humidity,
        wind_speed: data.wind.and_then(|wind| wind.speed),
        temperature_c: data.main.temp.round(),
        pressure_hpa: data.main.pressure,
    }
    .clamped()
}

impl WeatherProvider for OpenWeatherClient {
    fn origin(&self) -> SnapshotOrigin {
        SnapshotOrigin::Live
    }

    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send {
        self.current(location)
    }
}
