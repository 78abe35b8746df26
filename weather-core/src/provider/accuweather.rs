use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::ConditionsError,
    model::{ConditionsInfo, LocationKey, Temperature},
    provider::truncate_body,
};

use super::ConditionsProvider;

pub const DEFAULT_BASE_URL: &str = "https://dataservice.accuweather.com";

#[derive(Debug, Clone)]
pub struct AccuWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl AccuWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ConditionsError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ConditionsError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwLocation {
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwMetric {
    value: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwTemperature {
    metric: AwMetric,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwCurrentConditions {
    weather_text: String,
    is_day_time: bool,
    has_precipitation: bool,
    precipitation_type: Option<String>,
    temperature: AwTemperature,
}

#[async_trait]
impl ConditionsProvider for AccuWeatherProvider {
    async fn location_key(&self, city_name: &str) -> Result<LocationKey, ConditionsError> {
        debug!(city = city_name, "searching AccuWeather location");

        let locations: Vec<AwLocation> =
            self.get_json("/locations/v1/cities/search", &[("q", city_name)]).await?;

        locations
            .into_iter()
            .next()
            .map(|loc| LocationKey(loc.key))
            .ok_or_else(|| ConditionsError::NotFound(format!("city '{city_name}'")))
    }

    async fn current_conditions(
        &self,
        key: &LocationKey,
    ) -> Result<ConditionsInfo, ConditionsError> {
        debug!(location_key = %key, "fetching AccuWeather current conditions");

        let path = format!("/currentconditions/v1/{key}");
        let observations: Vec<AwCurrentConditions> = self.get_json(&path, &[]).await?;

        let current = observations.into_iter().next().ok_or_else(|| {
            ConditionsError::NotFound(format!("current conditions at location {key}"))
        })?;

        Ok(ConditionsInfo {
            weather_text: current.weather_text,
            day_time: current.is_day_time,
            has_precipitation: current.has_precipitation,
            precipitation_type: current.precipitation_type,
            temperature: Temperature {
                value: current.temperature.metric.value,
                unit: current.temperature.metric.unit,
            },
        })
    }
}
