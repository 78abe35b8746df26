use chrono::{DateTime, Utc};
use weather_agg_core::UnifiedWeatherResponse;

fn utc_time(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Human-readable block for `show`.
pub fn summary(city: &str, zip: &str, w: &UnifiedWeatherResponse) -> String {
    let precipitation = match (w.has_precipitation, w.precipitation_type.as_deref()) {
        (false, _) => "none".to_string(),
        (true, Some(kind)) => kind.to_lowercase(),
        (true, None) => "yes".to_string(),
    };
    let gust = w.wind.gust.map(|g| format!(", gusts {g:.1} m/s")).unwrap_or_default();

    format!(
        "{city} / {zip}\n\
         \n\
         {} ({})\n\
         temperature   : {:.1} {}\n\
         feels like    : {:.1} {}\n\
         precipitation : {precipitation}\n\
         humidity      : {}%\n\
         pressure      : {} hPa\n\
         visibility    : {} m\n\
         wind          : {:.1} m/s from {}°{gust}\n\
         sunrise       : {}\n\
         sunset        : {}",
        w.weather_text,
        if w.day_time { "day" } else { "night" },
        w.temperature.value,
        w.temperature.unit,
        w.feels_like.value,
        w.feels_like.unit,
        w.humidity,
        w.pressure,
        w.visibility,
        w.wind.speed,
        w.wind.deg,
        utc_time(w.sunrise),
        utc_time(w.sunset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_agg_core::{Temperature, Wind};

    fn sample() -> UnifiedWeatherResponse {
        UnifiedWeatherResponse {
            weather_text: "Clear".into(),
            day_time: true,
            has_precipitation: false,
            precipitation_type: None,
            temperature: Temperature {
                value: 18.0,
                unit: "C".into(),
            },
            feels_like: Temperature {
                value: 17.999999999999986,
                unit: "C".into(),
            },
            pressure: 1012,
            humidity: 60,
            visibility: 10000,
            wind: Wind {
                speed: 3.1,
                deg: 200,
                gust: Some(5.0),
            },
            sunrise: 1000,
            sunset: 2000,
        }
    }

    #[test]
    fn summary_lists_merged_fields() {
        let out = summary("London", "10001", &sample());

        assert!(out.starts_with("London / 10001"));
        assert!(out.contains("Clear (day)"));
        assert!(out.contains("temperature   : 18.0 C"));
        assert!(out.contains("feels like    : 18.0 C"));
        assert!(out.contains("precipitation : none"));
        assert!(out.contains("wind          : 3.1 m/s from 200°, gusts 5.0 m/s"));
        assert!(out.contains("sunrise       : 00:16 UTC"));
        assert!(out.contains("sunset        : 00:33 UTC"));
    }

    #[test]
    fn summary_names_precipitation_type_and_omits_missing_gust() {
        let mut w = sample();
        w.day_time = false;
        w.has_precipitation = true;
        w.precipitation_type = Some("Rain".into());
        w.wind.gust = None;

        let out = summary("London", "10001", &w);

        assert!(out.contains("Clear (night)"));
        assert!(out.contains("precipitation : rain"));
        assert!(!out.contains("gusts"));
    }
}
