//! OpenWeatherMap response bodies, as sent on the wire.
//!
//! Only the fields SkyCast reads are modelled; everything else is ignored.

use serde::Deserialize;

use crate::types::{Coordinates, WeatherSnapshot};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCondition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: u32,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSys {
    pub country: Option<String>,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCoord {
    pub lat: f64,
    pub lon: f64,
}

/// Body of `GET /weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub coord: Option<ApiCoord>,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    #[serde(default)]
    pub wind: ApiWind,
    #[serde(default)]
    pub sys: ApiSys,
    #[serde(default)]
    pub dt: i64,
}

impl From<CurrentResponse> for WeatherSnapshot {
    fn from(r: CurrentResponse) -> Self {
        let condition = r.weather.into_iter().next().unwrap_or_default();
        Self {
            name: r.name,
            country: r.sys.country,
            coordinates: r.coord.map(|c| Coordinates::new(c.lat, c.lon)),
            temperature: r.main.temp,
            feels_like: r.main.feels_like,
            temp_min: r.main.temp_min,
            temp_max: r.main.temp_max,
            pressure: r.main.pressure,
            humidity: r.main.humidity,
            wind_speed: r.wind.speed,
            condition: condition.main,
            description: condition.description,
            icon: condition.icon,
            sunrise: r.sys.sunrise,
            sunset: r.sys.sunset,
            observed_at: r.dt,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingMain {
    pub temp: f64,
}

/// One element of the 3-hourly forecast series
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    pub dt: i64,
    pub main: ReadingMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    /// "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
}

/// Body of `GET /forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<RawReading>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_response_to_snapshot() {
        let body = serde_json::json!({
            "coord": {"lon": 2.35, "lat": 48.85},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "main": {"temp": 18.4, "feels_like": 17.9, "temp_min": 16.1, "temp_max": 19.8, "pressure": 1012, "humidity": 64},
            "wind": {"speed": 4.1, "deg": 250},
            "dt": 1717236000,
            "sys": {"country": "FR", "sunrise": 1717213500, "sunset": 1717271000},
            "name": "Paris",
            "cod": 200
        });

        let parsed: CurrentResponse = serde_json::from_value(body).unwrap();
        let snapshot = WeatherSnapshot::from(parsed);

        assert_eq!(snapshot.name, "Paris");
        assert_eq!(snapshot.country.as_deref(), Some("FR"));
        assert_eq!(snapshot.coordinates, Some(Coordinates::new(48.85, 2.35)));
        assert_eq!(snapshot.condition, "Clouds");
        assert_eq!(snapshot.description, "broken clouds");
        assert_eq!(snapshot.icon, "04d");
        assert_eq!(snapshot.pressure, 1012);
        assert_eq!(snapshot.humidity, 64);
        assert_eq!(snapshot.sunrise, 1717213500);
        assert_eq!(snapshot.observed_at, 1717236000);
    }

    #[test]
    fn test_missing_weather_array_gives_empty_condition() {
        let body = serde_json::json!({
            "name": "Nowhere",
            "main": {"temp": 1.0}
        });

        let snapshot = WeatherSnapshot::from(serde_json::from_value::<CurrentResponse>(body).unwrap());
        assert_eq!(snapshot.condition, "");
        assert_eq!(snapshot.icon, "");
        assert_eq!(snapshot.wind_speed, 0.0);
    }
}
