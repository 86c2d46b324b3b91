//! Device location capability.
//!
//! SkyCast consumes a position; it does not implement platform geolocation.
//! Front ends plug in whatever source they have.

use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Resolve the current position. May wait for a permission prompt.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from user configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<Coordinates>,
    allowed: bool,
}

impl ConfiguredLocation {
    pub fn new(coordinates: Option<Coordinates>, allowed: bool) -> Self {
        Self {
            coordinates,
            allowed,
        }
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.allowed {
            return Err(LocationError::PermissionDenied);
        }
        self.coordinates.ok_or(LocationError::Unsupported)
    }
}

/// For platforms without any location source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}
