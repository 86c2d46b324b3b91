//! Weather service for SkyCast
//!
//! Provides current conditions and noon forecasts from the OpenWeatherMap API,
//! plus the device-location capability used for "use my location".

pub mod display;
pub mod forecast;
pub mod location;
pub mod provider;
pub mod types;
pub mod wire;

pub use display::{Backdrop, SunCycle};
pub use forecast::noon_readings;
pub use location::{ConfiguredLocation, Geolocator, NoGeolocation};
pub use provider::{ClientOptions, WeatherClient, WeatherSource};
pub use types::*;
