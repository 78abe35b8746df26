//! Concurrent two-chain lookup joined into a single [`UnifiedWeatherResponse`].
//!
//! ```text
//! city ── location_key ──► current_conditions ─┐
//!                                             ├─► merge
//! zip ─── geocode ───────► weather_details ────┘
//! ```
//!
//! Each chain runs as its own task. Root lookups hold a worker from the
//! [`WorkerPool`]; the dependent lookup starts as soon as its root resolves.
//! The caller waits once, on the join of both chains. Any failure fails the
//! whole call. Nothing times out: a hung lookup hangs the call.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    error::{AggregationError, Stage},
    merge::merge,
    model::{ConditionsInfo, ForecastInfo, UnifiedWeatherResponse},
    pool::WorkerPool,
    provider::{ConditionsProvider, ForecastProvider},
};

#[derive(Debug, Clone)]
pub struct WeatherAggregator {
    conditions: Arc<dyn ConditionsProvider>,
    forecast: Arc<dyn ForecastProvider>,
    pool: WorkerPool,
}

impl WeatherAggregator {
    /// Aggregator backed by the process-wide [`WorkerPool::shared`] pool.
    pub fn new(
        conditions: Arc<dyn ConditionsProvider>,
        forecast: Arc<dyn ForecastProvider>,
    ) -> Self {
        Self::with_pool(conditions, forecast, WorkerPool::shared().clone())
    }

    pub fn with_pool(
        conditions: Arc<dyn ConditionsProvider>,
        forecast: Arc<dyn ForecastProvider>,
        pool: WorkerPool,
    ) -> Self {
        Self {
            conditions,
            forecast,
            pool,
        }
    }

    /// The pool root lookups run on.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Look up `city_name` on AccuWeather and `zip_code` on OpenWeather
    /// concurrently and merge the results.
    ///
    /// Inputs are passed to the providers as-is.
    pub async fn get_weather_details(
        &self,
        city_name: &str,
        zip_code: &str,
    ) -> Result<UnifiedWeatherResponse, AggregationError> {
        debug!(city = city_name, zip = zip_code, "starting weather aggregation");

        let conditions = self.spawn_conditions_chain(city_name.to_owned());
        let forecast = self.spawn_forecast_chain(zip_code.to_owned());

        let (conditions, forecast) = tokio::try_join!(join(conditions), join(forecast))?;

        let response = merge(&conditions, &forecast);
        info!(city = city_name, zip = zip_code, "weather aggregated");
        Ok(response)
    }

    fn spawn_conditions_chain(
        &self,
        city_name: String,
    ) -> JoinHandle<Result<ConditionsInfo, AggregationError>> {
        let provider = Arc::clone(&self.conditions);
        let pool = self.pool.clone();

        tokio::spawn(async move {
            let key = pool
                .run(provider.location_key(&city_name))
                .await
                .map_err(|e| AggregationError::conditions(Stage::LocationKey, e))?;
            debug!(city = %city_name, location_key = %key, "location key resolved");

            provider
                .current_conditions(&key)
                .await
                .map_err(|e| AggregationError::conditions(Stage::CurrentConditions, e))
        })
    }

    fn spawn_forecast_chain(
        &self,
        zip_code: String,
    ) -> JoinHandle<Result<ForecastInfo, AggregationError>> {
        let provider = Arc::clone(&self.forecast);
        let pool = self.pool.clone();

        tokio::spawn(async move {
            let coord = pool
                .run(provider.geocode(&zip_code))
                .await
                .map_err(|e| AggregationError::forecast(Stage::Geocode, e))?;
            debug!(zip = %zip_code, lat = coord.lat, lon = coord.lon, "zip geocoded");

            provider
                .weather_details(coord)
                .await
                .map_err(|e| AggregationError::forecast(Stage::WeatherDetails, e))
        })
    }
}

async fn join<T>(handle: JoinHandle<Result<T, AggregationError>>) -> Result<T, AggregationError> {
    handle.await?
}
