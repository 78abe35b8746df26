use crate::{
    Config, WeatherAggregator,
    error::{ConditionsError, ForecastError},
    model::{ConditionsInfo, ForecastInfo, GeoCoordinate, LocationKey},
    provider::{accuweather::AccuWeatherProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod accuweather;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    AccuWeather,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::AccuWeather => "accuweather",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::AccuWeather, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "accuweather" => Ok(ProviderId::AccuWeather),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: accuweather, openweather."
            )),
        }
    }
}

/// City-keyed conditions source (AccuWeather).
#[async_trait]
pub trait ConditionsProvider: Send + Sync + Debug {
    async fn location_key(&self, city_name: &str) -> Result<LocationKey, ConditionsError>;

    async fn current_conditions(
        &self,
        key: &LocationKey,
    ) -> Result<ConditionsInfo, ConditionsError>;
}

/// Postal-code-keyed forecast source (OpenWeather).
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn geocode(&self, zip_code: &str) -> Result<GeoCoordinate, ForecastError>;

    async fn weather_details(&self, coord: GeoCoordinate) -> Result<ForecastInfo, ForecastError>;
}

fn api_key_for(config: &Config, id: ProviderId) -> anyhow::Result<String> {
    config.provider_api_key(id).map(str::to_owned).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather-agg configure {id}` and enter your API key."
        )
    })
}

fn base_url_for(config: &Config, id: ProviderId) -> Option<String> {
    config.provider_config(id).and_then(|cfg| cfg.base_url.clone())
}

/// Build an aggregator over the HTTP clients described by `config`,
/// sharing the process-wide worker pool.
pub fn aggregator_from_config(config: &Config) -> anyhow::Result<WeatherAggregator> {
    let accu_key = api_key_for(config, ProviderId::AccuWeather)?;
    let open_key = api_key_for(config, ProviderId::OpenWeather)?;

    let accuweather = match base_url_for(config, ProviderId::AccuWeather) {
        Some(url) => AccuWeatherProvider::with_base_url(accu_key, url),
        None => AccuWeatherProvider::new(accu_key),
    };
    let openweather = match base_url_for(config, ProviderId::OpenWeather) {
        Some(url) => OpenWeatherProvider::with_base_url(open_key, url),
        None => OpenWeatherProvider::new(open_key),
    };

    Ok(WeatherAggregator::new(Arc::new(accuweather), Arc::new(openweather)))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ROOT_LOOKUP_WORKERS;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_is_case_insensitive() {
        assert_eq!(ProviderId::try_from("AccuWeather").unwrap(), ProviderId::AccuWeather);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("metoffice").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn aggregator_from_config_errors_when_missing_api_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::AccuWeather, "ACCU".to_string());

        let err = aggregator_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No API key configured for provider 'openweather'"));
        assert!(msg.contains("Hint: run `weather-agg configure openweather`"));
    }

    #[test]
    fn aggregator_from_config_uses_the_shared_pool() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::AccuWeather, "ACCU".to_string());
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN".to_string());

        let aggregator = aggregator_from_config(&cfg).expect("both providers configured");
        assert_eq!(aggregator.pool().size(), ROOT_LOOKUP_WORKERS);
    }

    #[test]
    fn default_base_urls_use_https() {
        assert!(accuweather::DEFAULT_BASE_URL.starts_with("https://"));
        assert!(openweather::DEFAULT_BASE_URL.starts_with("https://"));
    }

    #[test]
    fn aggregator_from_config_works_when_both_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::AccuWeather, "ACCU".to_string());
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN".to_string());

        assert!(aggregator_from_config(&cfg).is_ok());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
