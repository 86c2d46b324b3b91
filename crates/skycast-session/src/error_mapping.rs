//! Failures of session actions and their mapping to `skycast_core::AppError`
//! for user-facing messages.

use skycast_core::{AppError, NetworkError};
use skycast_weather::{LocationError, WeatherError};

/// Why a lookup action failed
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Coarse failure classification, for callers that branch on the cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Network,
    InvalidResponse,
    LocationDenied,
    LocationUnsupported,
}

impl ActionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Weather(e) if e.is_network() => FailureKind::Network,
            Self::Weather(WeatherError::NotFound { .. }) => FailureKind::NotFound,
            Self::Weather(_) => FailureKind::InvalidResponse,
            Self::Location(LocationError::PermissionDenied) => FailureKind::LocationDenied,
            Self::Location(LocationError::Unsupported) => FailureKind::LocationUnsupported,
        }
    }
}

impl From<ActionError> for AppError {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::Weather(WeatherError::NotFound { query, status }) => AppError::Weather(
                skycast_core::WeatherError::LocationNotFound(format!("{query} (HTTP {status})")),
            ),
            ActionError::Weather(WeatherError::Network(s)) => {
                AppError::Network(NetworkError::ConnectionFailed(s))
            }
            ActionError::Weather(WeatherError::Timeout) => AppError::Network(NetworkError::Timeout),
            ActionError::Weather(WeatherError::InvalidResponse(s)) => {
                AppError::Network(NetworkError::InvalidResponse(s))
            }
            ActionError::Location(LocationError::PermissionDenied) => {
                AppError::Location(skycast_core::LocationError::PermissionDenied)
            }
            ActionError::Location(LocationError::Unsupported) => {
                AppError::Location(skycast_core::LocationError::Unsupported)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let not_found = ActionError::from(WeatherError::NotFound {
            query: "Atlantis".into(),
            status: 404,
        });
        assert_eq!(not_found.kind(), FailureKind::NotFound);
        assert_eq!(
            ActionError::from(WeatherError::Timeout).kind(),
            FailureKind::Network
        );
        assert_eq!(
            ActionError::from(WeatherError::Network("reset".into())).kind(),
            FailureKind::Network
        );
        assert_eq!(
            ActionError::from(WeatherError::InvalidResponse("eof".into())).kind(),
            FailureKind::InvalidResponse
        );
        assert_eq!(
            ActionError::from(LocationError::PermissionDenied).kind(),
            FailureKind::LocationDenied
        );
    }

    #[test]
    fn test_not_found_message() {
        let app: AppError = ActionError::from(WeatherError::NotFound {
            query: "Atlantis".into(),
            status: 404,
        })
        .into();
        assert!(app.user_message().contains("City not found"));
        assert!(app.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_network_message() {
        let app: AppError = ActionError::from(WeatherError::Network("connection reset".into())).into();
        assert!(app.user_message().contains("internet connection"));
    }

    #[test]
    fn test_location_messages() {
        let denied: AppError = ActionError::from(LocationError::PermissionDenied).into();
        let unsupported: AppError = ActionError::from(LocationError::Unsupported).into();
        assert!(denied.user_message().contains("denied"));
        assert_ne!(denied.user_message(), unsupported.user_message());
    }
}
