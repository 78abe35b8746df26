//! Pure merge of the two provider results into one record.

use crate::model::{ConditionsInfo, ForecastInfo, Temperature, UnifiedWeatherResponse};

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Combine AccuWeather conditions with OpenWeather details.
pub fn merge(conditions: &ConditionsInfo, forecast: &ForecastInfo) -> UnifiedWeatherResponse {
    UnifiedWeatherResponse {
        weather_text: conditions.weather_text.clone(),
        day_time: conditions.day_time,
        has_precipitation: conditions.has_precipitation,
        precipitation_type: conditions.precipitation_type.clone(),
        temperature: conditions.temperature.clone(),
        feels_like: Temperature {
            value: kelvin_to_celsius(forecast.main.feels_like),
            unit: "C".to_string(),
        },
        pressure: forecast.main.pressure,
        humidity: forecast.main.humidity,
        visibility: forecast.visibility,
        wind: forecast.wind.clone(),
        sunrise: forecast.sys.sunrise,
        sunset: forecast.sys.sunset,
    }
}
