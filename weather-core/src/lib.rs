//! Core library for the `weather-agg` CLI.
//!
//! This crate defines:
//! - Provider ports for AccuWeather (city → conditions) and OpenWeather (zip → details)
//! - HTTP clients implementing those ports
//! - The concurrent aggregator and the merge into one response
//! - Configuration & credentials handling
//!
//! It is used by `weather-agg`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod pool;
pub mod provider;

pub use aggregator::WeatherAggregator;
pub use config::{Config, ProviderConfig};
pub use error::{AggregationError, ConditionsError, ForecastError, Stage};
pub use model::{
    ConditionsInfo, ForecastInfo, GeoCoordinate, LocationKey, Temperature, UnifiedWeatherResponse,
    Wind,
};
pub use pool::{ROOT_LOOKUP_WORKERS, WorkerPool};
pub use provider::{ConditionsProvider, ForecastProvider, ProviderId, aggregator_from_config};
