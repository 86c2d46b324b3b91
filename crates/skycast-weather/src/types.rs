use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Value of the provider's `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Suffix for temperatures in this unit system
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => " K",
        }
    }

    /// Suffix for wind speeds in this unit system
    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Self::Metric | Self::Standard => "m/s",
            Self::Imperial => "mph",
        }
    }
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What to look up: a free-text city name or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    City(String),
    Coordinates(Coordinates),
}

impl Locator {
    /// Provider query parameters selecting this location
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(name) => write!(f, "{name}"),
            Self::Coordinates(c) => write!(f, "{:.4}, {:.4}", c.latitude, c.longitude),
        }
    }
}

/// Current conditions for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Location name as resolved by the provider
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// hPa
    pub pressure: u32,
    /// Percent
    pub humidity: u8,
    pub wind_speed: f64,
    /// Condition category, e.g. "Clouds"
    pub condition: String,
    /// e.g. "scattered clouds"
    pub description: String,
    pub icon: String,
    /// Epoch seconds
    pub sunrise: i64,
    pub sunset: i64,
    pub observed_at: i64,
}

/// One forecast reading kept by the noon filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Epoch seconds
    pub timestamp: i64,
    /// The provider's textual timestamp, parsed
    pub local_time: NaiveDateTime,
    pub temperature: f64,
    pub icon: String,
    pub description: String,
}

impl ForecastEntry {
    pub fn date(&self) -> NaiveDate {
        self.local_time.date()
    }
}

/// Device location errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unsupported")]
    Unsupported,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Non-success status from the provider (unknown city, bad API key, ...)
    #[error("No weather for '{query}' (HTTP {status})")]
    NotFound { query: String, status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    /// Transport-level failure (including timeouts)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_query_values() {
        assert_eq!(Units::default().as_query(), "metric");
        assert_eq!(Units::Imperial.as_query(), "imperial");
        assert_eq!(Units::Standard.as_query(), "standard");
    }

    #[test]
    fn test_city_query_pairs() {
        let pairs = Locator::City("São Paulo".into()).query_pairs();
        assert_eq!(pairs, vec![("q", "São Paulo".to_string())]);
    }

    #[test]
    fn test_coordinate_query_pairs() {
        let pairs = Locator::Coordinates(Coordinates::new(48.8566, 2.3522)).query_pairs();
        assert_eq!(
            pairs,
            vec![("lat", "48.8566".to_string()), ("lon", "2.3522".to_string())]
        );
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::City("Oslo".into()).to_string(), "Oslo");
        assert_eq!(
            Locator::Coordinates(Coordinates::new(59.91, 10.75)).to_string(),
            "59.9100, 10.7500"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(WeatherError::Timeout.is_network());
        assert!(WeatherError::Network("reset".into()).is_network());
        assert!(!WeatherError::NotFound {
            query: "x".into(),
            status: 404
        }
        .is_network());
        assert!(!WeatherError::InvalidResponse("eof".into()).is_network());
    }
}
