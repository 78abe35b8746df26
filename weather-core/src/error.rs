use reqwest::{Error as ReqwestError, StatusCode};
use serde_json::Error as JsonError;
use tokio::task::JoinError;

/// Failure of an AccuWeather lookup (location key or current conditions).
#[derive(thiserror::Error, Debug)]
pub enum ConditionsError {
    #[error("AccuWeather network error: {0}")]
    Network(#[from] ReqwestError),
    #[error("AccuWeather request failed with status {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
    },
    #[error("Failed to parse AccuWeather response: {0}")]
    Parse(#[from] JsonError),
    #[error("AccuWeather has no data for {0}")]
    NotFound(String),
}

/// Failure of an OpenWeather lookup (geocoding or weather details).
#[derive(thiserror::Error, Debug)]
pub enum ForecastError {
    #[error("OpenWeather network error: {0}")]
    Network(#[from] ReqwestError),
    #[error("OpenWeather request failed with status {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
    },
    #[error("Failed to parse OpenWeather response: {0}")]
    Parse(#[from] JsonError),
    #[error("OpenWeather has no data for {0}")]
    NotFound(String),
}

/// The lookup that was running when an aggregation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    LocationKey,
    CurrentConditions,
    Geocode,
    WeatherDetails,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LocationKey => "location key lookup",
            Stage::CurrentConditions => "current conditions lookup",
            Stage::Geocode => "geocoding",
            Stage::WeatherDetails => "weather details lookup",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single failure reported by [`crate::WeatherAggregator::get_weather_details`].
#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("Weather retrieval failed during {stage}")]
    Conditions {
        stage: Stage,
        #[source]
        source: ConditionsError,
    },
    #[error("Weather retrieval failed during {stage}")]
    Forecast {
        stage: Stage,
        #[source]
        source: ForecastError,
    },
    #[error("Weather retrieval worker failed: {0}")]
    Worker(#[from] JoinError),
}

impl AggregationError {
    pub fn conditions(stage: Stage, source: ConditionsError) -> Self {
        Self::Conditions { stage, source }
    }

    pub fn forecast(stage: Stage, source: ForecastError) -> Self {
        Self::Forecast { stage, source }
    }

    /// The failing lookup, when the failure came from a provider.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Conditions { stage, .. } | Self::Forecast { stage, .. } => Some(*stage),
            Self::Worker(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn aggregation_error_keeps_stage_and_cause() {
        let err = AggregationError::forecast(
            Stage::Geocode,
            ForecastError::NotFound("zip 00000".to_string()),
        );

        assert_eq!(err.stage(), Some(Stage::Geocode));
        assert_eq!(err.to_string(), "Weather retrieval failed during geocoding");

        let source = err.source().expect("cause must be preserved");
        assert!(source.to_string().contains("zip 00000"));
    }
}
