//! The session controller: which screen is shown, whether a lookup is in
//! flight, the last error, the current weather, and the recent searches.
//!
//! Lookups run in three steps so a front end can render while waiting:
//! [`Session::begin_query`] / [`Session::begin_locate`] hand out a
//! [`PendingFetch`], its [`PendingFetch::run`] performs the network calls
//! without touching the session, and [`Session::finish`] applies the result.
//! The async helpers ([`Session::submit_query`] and friends) do all three.
//!
//! Only one lookup is in flight at a time. Starting another while one is
//! pending is ignored, and a completion that does not belong to the pending
//! lookup (e.g. after [`Session::cancel`]) is discarded.

use std::sync::Arc;

use skycast_core::{AppError, KeyValueStore};
use skycast_weather::{ForecastEntry, Geolocator, Locator, WeatherSnapshot, WeatherSource};

use crate::error_mapping::{ActionError, FailureKind};
use crate::recent::RecentSearches;

/// Screen being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Search,
    Dashboard,
}

/// Current conditions and forecast from one successful lookup.
///
/// Kept as a single value so the two are always replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
}

/// Result of a session action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened: blank query, or another lookup is in flight
    Ignored,
    /// New weather is on the dashboard
    Loaded,
    /// Error message set; weather and recents untouched
    Failed(FailureKind),
}

#[derive(Debug, Clone)]
enum Target {
    Locator(Locator),
    DevicePosition,
}

/// A lookup that has been started but not yet performed
pub struct PendingFetch {
    id: u64,
    target: Target,
    source: Arc<dyn WeatherSource>,
    geolocator: Arc<dyn Geolocator>,
}

impl std::fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFetch")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl PendingFetch {
    /// Perform the lookup. Current conditions and forecast are fetched
    /// concurrently and both must succeed.
    pub async fn run(self) -> FetchCompletion {
        let result = fetch_dashboard(&*self.source, &*self.geolocator, self.target).await;
        FetchCompletion {
            id: self.id,
            result,
        }
    }
}

async fn fetch_dashboard(
    source: &dyn WeatherSource,
    geolocator: &dyn Geolocator,
    target: Target,
) -> Result<Dashboard, ActionError> {
    let locator = match target {
        Target::Locator(locator) => locator,
        Target::DevicePosition => {
            let position = geolocator.current_position().await?;
            tracing::info!(
                "Got location: {}, {}",
                position.latitude,
                position.longitude
            );
            Locator::Coordinates(position)
        }
    };

    let (current, forecast) = tokio::join!(
        source.fetch_current(&locator),
        source.fetch_forecast(&locator)
    );

    Ok(Dashboard {
        current: current?,
        forecast: forecast?,
    })
}

/// Outcome of [`PendingFetch::run`], to hand back to [`Session::finish`]
#[derive(Debug)]
pub struct FetchCompletion {
    id: u64,
    result: Result<Dashboard, ActionError>,
}

/// Clears the in-flight marker when dropped, so an abandoned lookup future
/// does not leave the session loading forever.
struct InFlight<'a>(&'a mut Option<u64>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = None;
    }
}

pub struct Session {
    view: View,
    in_flight: Option<u64>,
    next_request: u64,
    error: Option<String>,
    dashboard: Option<Dashboard>,
    recent: RecentSearches,
    source: Arc<dyn WeatherSource>,
    geolocator: Arc<dyn Geolocator>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("view", &self.view)
            .field("in_flight", &self.in_flight)
            .field("error", &self.error)
            .field("dashboard", &self.dashboard.as_ref().map(|d| &d.current.name))
            .field("recent", &self.recent)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// New session on the landing screen; recent searches are read from `store`.
    pub fn new(
        source: Arc<dyn WeatherSource>,
        geolocator: Arc<dyn Geolocator>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            view: View::Landing,
            in_flight: None,
            next_request: 0,
            error: None,
            dashboard: None,
            recent: RecentSearches::load(store),
            source,
            geolocator,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// User-facing message of the last failed action
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.dashboard.as_ref().map(|d| &d.current)
    }

    pub fn forecast(&self) -> &[ForecastEntry] {
        self.dashboard
            .as_ref()
            .map(|d| d.forecast.as_slice())
            .unwrap_or_default()
    }

    pub fn recent(&self) -> &[String] {
        self.recent.entries()
    }

    /// Recent search by position, 0 being the most recent
    pub fn recent_at(&self, index: usize) -> Option<&str> {
        self.recent.get(index)
    }

    /// Landing or dashboard → search
    pub fn open_search(&mut self) {
        self.view = View::Search;
    }

    /// Search → landing. Elsewhere a no-op.
    pub fn go_back(&mut self) {
        if self.view == View::Search {
            self.view = View::Landing;
        }
    }

    pub fn go_home(&mut self) {
        self.view = View::Landing;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Start a lookup by city name.
    ///
    /// Returns `None`, changing nothing, for a blank name or while another
    /// lookup is in flight.
    pub fn begin_query(&mut self, city: &str) -> Option<PendingFetch> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        self.begin(Target::Locator(Locator::City(city.to_string())))
    }

    /// Start a lookup of the device position.
    ///
    /// Returns `None` while another lookup is in flight.
    pub fn begin_locate(&mut self) -> Option<PendingFetch> {
        self.begin(Target::DevicePosition)
    }

    fn begin(&mut self, target: Target) -> Option<PendingFetch> {
        if let Some(id) = self.in_flight {
            tracing::debug!(pending = id, ?target, "Lookup already in flight; ignoring");
            return None;
        }

        self.next_request += 1;
        let id = self.next_request;
        self.in_flight = Some(id);
        self.error = None;

        tracing::debug!(id, ?target, "Starting lookup");
        Some(PendingFetch {
            id,
            target,
            source: Arc::clone(&self.source),
            geolocator: Arc::clone(&self.geolocator),
        })
    }

    /// Apply a finished lookup.
    ///
    /// On success the dashboard is replaced, the location is recorded in the
    /// recent searches and the dashboard is shown. On failure only the error
    /// message changes.
    pub fn finish(&mut self, completion: FetchCompletion) -> Outcome {
        if self.in_flight != Some(completion.id) {
            tracing::debug!(id = completion.id, "Discarding stale lookup result");
            return Outcome::Ignored;
        }
        self.in_flight = None;

        match completion.result {
            Ok(dashboard) => {
                tracing::info!(
                    location = %dashboard.current.name,
                    forecast_days = dashboard.forecast.len(),
                    "Weather data fetched successfully"
                );
                let name = dashboard.current.name.clone();
                self.dashboard = Some(dashboard);
                self.record_recent(&name);
                self.view = View::Dashboard;
                Outcome::Loaded
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!("Failed to fetch weather: {}", e);
                let app_error = AppError::from(e);
                self.error = Some(app_error.user_message().to_string());
                Outcome::Failed(kind)
            }
        }
    }

    /// Abandon the in-flight lookup; its completion will be discarded.
    pub fn cancel(&mut self) {
        if let Some(id) = self.in_flight.take() {
            tracing::debug!(id, "Lookup cancelled");
        }
    }

    async fn perform(&mut self, pending: Option<PendingFetch>) -> Outcome {
        let Some(pending) = pending else {
            return Outcome::Ignored;
        };

        let guard = InFlight(&mut self.in_flight);
        let completion = pending.run().await;
        // Ran to completion: keep the marker so `finish` accepts the result
        std::mem::forget(guard);
        self.finish(completion)
    }

    /// Look up `city` and show it on the dashboard
    pub async fn submit_query(&mut self, city: &str) -> Outcome {
        let pending = self.begin_query(city);
        self.perform(pending).await
    }

    /// Look up a name from the recent list
    pub async fn select_recent(&mut self, name: &str) -> Outcome {
        self.submit_query(name).await
    }

    /// Look up the device position
    pub async fn use_my_location(&mut self) -> Outcome {
        let pending = self.begin_locate();
        self.perform(pending).await
    }

    /// Put `name` at the front of the recent searches and persist them.
    /// A failed write is logged; the in-memory list is still updated.
    pub fn record_recent(&mut self, name: &str) {
        if let Err(e) = self.recent.record(name) {
            tracing::warn!("Failed to save recent searches: {}", e);
        }
    }

    /// Forget all recent searches
    pub fn clear_recent(&mut self) {
        if let Err(e) = self.recent.clear() {
            tracing::warn!("Failed to remove recent searches: {}", e);
        }
    }
}
