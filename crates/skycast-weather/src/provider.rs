//! OpenWeatherMap client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::forecast::noon_readings;
use crate::types::{ForecastEntry, Locator, Units, WeatherError, WeatherSnapshot};
use crate::wire::{CurrentResponse, ForecastResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const USER_AGENT: &str = "SkyCast/0.1.0";

/// Remote reads the session depends on.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for a location
    async fn fetch_current(&self, locator: &Locator) -> Result<WeatherSnapshot, WeatherError>;

    /// Noon readings of the multi-day forecast for a location
    async fn fetch_forecast(&self, locator: &Locator) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Settings for [`WeatherClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Sent as `appid`. Without one the provider rejects every request.
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: Units,
    /// `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::Metric,
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

impl WeatherClient {
    pub fn new(options: ClientOptions) -> Result<Self, WeatherError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        if options.api_key.is_none() {
            tracing::warn!("No weather API key configured; the provider will reject lookups");
        }

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_key: options.api_key.unwrap_or_default(),
            units: options.units,
        })
    }

    /// GET `{base_url}/{endpoint}` for `locator` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        locator: &Locator,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = locator.query_pairs();
        params.push(("units", self.units.as_query().to_string()));
        params.push(("appid", self.api_key.clone()));

        let response = self.client.get(&url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, endpoint, "provider rejected request");
            return Err(WeatherError::NotFound {
                query: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    #[instrument(skip(self, locator), fields(locator = %locator), level = "info")]
    async fn fetch_current(&self, locator: &Locator) -> Result<WeatherSnapshot, WeatherError> {
        let response: CurrentResponse = self.get_json("weather", locator).await?;
        Ok(WeatherSnapshot::from(response))
    }

    #[instrument(skip(self, locator), fields(locator = %locator), level = "info")]
    async fn fetch_forecast(&self, locator: &Locator) -> Result<Vec<ForecastEntry>, WeatherError> {
        let response: ForecastResponse = self.get_json("forecast", locator).await?;
        let total = response.list.len();
        let entries: Vec<_> = noon_readings(response.list).collect();
        tracing::debug!(total, kept = entries.len(), "filtered forecast to noon readings");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::new(ClientOptions {
            api_key: Some("test_key".into()),
            base_url: server.uri(),
            ..ClientOptions::default()
        })
        .unwrap()
    }

    fn current_body(name: &str) -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 12.3, "feels_like": 11.6, "temp_min": 10.9, "temp_max": 13.4, "pressure": 1008, "humidity": 81},
            "wind": {"speed": 5.7},
            "dt": 1717236000,
            "sys": {"country": "GB", "sunrise": 1717213000, "sunset": 1717272000},
            "name": name
        })
    }

    fn forecast_body() -> serde_json::Value {
        let times = [
            "2024-06-01 09:00:00",
            "2024-06-01 12:00:00",
            "2024-06-01 15:00:00",
            "2024-06-02 09:00:00",
            "2024-06-02 12:00:00",
        ];
        let list: Vec<_> = times
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::json!({
                    "dt": 1717232400 + i as i64 * 10800,
                    "main": {"temp": 10.0 + i as f64},
                    "weather": [{"main": "Clouds", "description": "few clouds", "icon": "02d"}],
                    "dt_txt": t
                })
            })
            .collect();
        serde_json::json!({ "cod": "200", "cnt": list.len(), "list": list, "city": {"name": "London"} })
    }

    #[tokio::test]
    async fn test_fetch_current_by_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let snapshot = client
            .fetch_current(&Locator::City("London".into()))
            .await
            .unwrap();

        assert_eq!(snapshot.name, "London");
        assert_eq!(snapshot.condition, "Rain");
        assert_eq!(snapshot.humidity, 81);
        assert_eq!(snapshot.wind_speed, 5.7);
    }

    #[tokio::test]
    async fn test_fetch_current_by_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "51.5085"))
            .and(query_param("lon", "-0.1257"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let snapshot = client
            .fetch_current(&Locator::Coordinates(Coordinates::new(51.5085, -0.1257)))
            .await
            .unwrap();

        assert_eq!(snapshot.name, "London");
    }

    #[tokio::test]
    async fn test_city_name_is_url_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Rio de Janeiro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Rio de Janeiro")))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let snapshot = client
            .fetch_current(&Locator::City("Rio de Janeiro".into()))
            .await
            .unwrap();

        assert_eq!(snapshot.name, "Rio de Janeiro");
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.fetch_current(&Locator::City("Atlantis".into())).await;

        assert!(matches!(
            result,
            Err(WeatherError::NotFound { status: 404, ref query }) if query == "Atlantis"
        ));
    }

    #[tokio::test]
    async fn test_bad_api_key_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.fetch_forecast(&Locator::City("Paris".into())).await;

        assert!(matches!(result, Err(WeatherError::NotFound { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.fetch_current(&Locator::City("Paris".into())).await;

        assert!(matches!(result, Err(WeatherError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_fetch_forecast_keeps_noon_readings() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let entries = client
            .fetch_forecast(&Locator::City("London".into()))
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].temperature, 11.0);
        assert_eq!(entries[1].temperature, 14.0);
        assert_eq!(entries[0].icon, "02d");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 9 (discard) on test machines
        let client = WeatherClient::new(ClientOptions {
            api_key: Some("k".into()),
            base_url: "http://127.0.0.1:9".into(),
            ..ClientOptions::default()
        })
        .unwrap();

        let result = client.fetch_current(&Locator::City("Paris".into())).await;
        assert!(result.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body("Paris"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(ClientOptions {
            api_key: Some("k".into()),
            base_url: mock_server.uri(),
            timeout: Some(Duration::from_millis(50)),
            ..ClientOptions::default()
        })
        .unwrap();

        let result = client.fetch_current(&Locator::City("Paris".into())).await;
        assert!(matches!(result, Err(WeatherError::Timeout)));
    }

    #[tokio::test]
    async fn test_units_are_forwarded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Boston")))
            .mount(&mock_server)
            .await;

        let client = WeatherClient::new(ClientOptions {
            api_key: Some("k".into()),
            base_url: format!("{}/", mock_server.uri()),
            units: Units::Imperial,
            timeout: None,
        })
        .unwrap();

        let snapshot = client
            .fetch_current(&Locator::City("Boston".into()))
            .await
            .unwrap();
        assert_eq!(snapshot.name, "Boston");
    }
}
