//! Builds the session and its services from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use skycast_core::{Config, FileStore, LocationConfig, WeatherConfig};
use skycast_session::Session;
use skycast_weather::{ClientOptions, ConfiguredLocation, Coordinates, WeatherClient};

use crate::render::RenderOptions;

pub fn weather_units(units: skycast_core::Units) -> skycast_weather::Units {
    match units {
        skycast_core::Units::Metric => skycast_weather::Units::Metric,
        skycast_core::Units::Imperial => skycast_weather::Units::Imperial,
        skycast_core::Units::Standard => skycast_weather::Units::Standard,
    }
}

pub fn client_options(config: &WeatherConfig) -> ClientOptions {
    let timeout = match config.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    ClientOptions {
        api_key: config.effective_api_key(),
        base_url: config.base_url.clone(),
        units: weather_units(config.units),
        timeout,
    }
}

pub fn geolocator(config: &LocationConfig) -> ConfiguredLocation {
    let coordinates = config
        .coordinates()
        .map(|(lat, lon)| Coordinates::new(lat, lon));
    ConfiguredLocation::new(coordinates, config.allow)
}

pub fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        units: weather_units(config.weather.units),
        show_forecast: config.ui.show_forecast,
        use_color: config.ui.use_color,
    }
}

pub fn build_session(config: &Config) -> Result<Session> {
    let client =
        WeatherClient::new(client_options(&config.weather)).context("Failed to create weather client")?;
    let store = FileStore::new(&config.data_dir);

    tracing::info!(
        data_dir = %config.data_dir.display(),
        units = ?config.weather.units,
        "Weather services initialized"
    );

    Ok(Session::new(
        Arc::new(client),
        Arc::new(geolocator(&config.location)),
        Arc::new(store),
    ))
}
