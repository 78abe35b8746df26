use serde::{Deserialize, Serialize};

/// Opaque AccuWeather location identifier for a city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey(pub String);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinates resolved by the OpenWeather geocoder for a postal code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub value: f64,
    pub unit: String,
}

/// Current conditions as reported by AccuWeather.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsInfo {
    pub weather_text: String,
    pub day_time: bool,
    pub has_precipitation: bool,
    pub precipitation_type: Option<String>,
    /// Metric temperature, copied as reported.
    pub temperature: Temperature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastMain {
    /// Kelvin.
    pub feels_like: f64,
    pub pressure: u32,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: u16,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSys {
    /// Unix seconds.
    pub sunrise: i64,
    /// Unix seconds.
    pub sunset: i64,
}

/// Current weather details as reported by OpenWeather for a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInfo {
    pub main: ForecastMain,
    pub visibility: u32,
    pub wind: Wind,
    pub sys: ForecastSys,
}

/// The merged record returned to callers.
///
/// Condition fields and `temperature` come from AccuWeather; everything else
/// comes from OpenWeather, with `feels_like` converted to Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedWeatherResponse {
    pub weather_text: String,
    pub day_time: bool,
    pub has_precipitation: bool,
    pub precipitation_type: Option<String>,
    pub temperature: Temperature,
    pub feels_like: Temperature,
    pub pressure: u32,
    pub humidity: u8,
    pub visibility: u32,
    pub wind: Wind,
    pub sunrise: i64,
    pub sunset: i64,
}
