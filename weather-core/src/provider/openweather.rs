use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::ForecastError,
    model::{ForecastInfo, ForecastMain, ForecastSys, GeoCoordinate, Wind},
    provider::truncate_body,
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
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

    /// `not_found` names the subject when the API answers 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: &str,
    ) -> Result<T, ForecastError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ForecastError::NotFound(not_found.to_string()));
        }
        if !status.is_success() {
            return Err(ForecastError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    feels_like: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: u16,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    visibility: u32,
    wind: OwWind,
    sys: OwSys,
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn geocode(&self, zip_code: &str) -> Result<GeoCoordinate, ForecastError> {
        debug!(zip = zip_code, "geocoding with OpenWeather");

        let parsed: OwGeocode = self
            .get_json(
                "/geo/1.0/zip",
                &[("zip", zip_code.to_string())],
                &format!("zip '{zip_code}'"),
            )
            .await?;

        Ok(GeoCoordinate {
            lat: parsed.lat,
            lon: parsed.lon,
        })
    }

    async fn weather_details(&self, coord: GeoCoordinate) -> Result<ForecastInfo, ForecastError> {
        debug!(lat = coord.lat, lon = coord.lon, "fetching OpenWeather details");

        // No `units` parameter: temperatures come back in Kelvin.
        let parsed: OwCurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                &[("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())],
                &format!("coordinates {},{}", coord.lat, coord.lon),
            )
            .await?;

        Ok(ForecastInfo {
            main: ForecastMain {
                feels_like: parsed.main.feels_like,
                pressure: parsed.main.pressure,
                humidity: parsed.main.humidity,
            },
            visibility: parsed.visibility,
            wind: Wind {
                speed: parsed.wind.speed,
                deg: parsed.wind.deg,
                gust: parsed.wind.gust,
            },
            sys: ForecastSys {
                sunrise: parsed.sys.sunrise,
                sunset: parsed.sys.sunset,
            },
        })
    }
}
