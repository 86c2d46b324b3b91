//! Derived values for the dashboard: daylight progress and backdrop theme.

use crate::types::WeatherSnapshot;

/// Daylight window of one day, in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunCycle {
    pub sunrise: i64,
    pub sunset: i64,
}

impl SunCycle {
    pub fn new(sunrise: i64, sunset: i64) -> Self {
        Self { sunrise, sunset }
    }

    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self::new(snapshot.sunrise, snapshot.sunset)
    }

    /// Fraction of daylight elapsed at `now`, clamped to [0, 1]
    pub fn progress_at(&self, now: i64) -> f64 {
        let total = self.sunset - self.sunrise;
        if total <= 0 {
            return if now < self.sunrise { 0.0 } else { 1.0 };
        }
        ((now - self.sunrise) as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// `progress_at` as a whole percentage
    pub fn percent_at(&self, now: i64) -> u8 {
        (self.progress_at(now) * 100.0).round() as u8
    }
}

/// Dashboard backdrop, picked from the condition category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backdrop {
    #[default]
    Default,
    Cloudy,
    Rainy,
    Clear,
}

impl Backdrop {
    pub fn for_condition(condition: &str) -> Self {
        let c = condition.to_lowercase();
        if c.contains("cloud") {
            Self::Cloudy
        } else if c.contains("rain") {
            Self::Rainy
        } else if c.contains("clear") {
            Self::Clear
        } else {
            Self::Default
        }
    }

    /// Backdrop for an optional snapshot; no data yet means `Default`
    pub fn for_snapshot(snapshot: Option<&WeatherSnapshot>) -> Self {
        snapshot
            .map(|s| Self::for_condition(&s.condition))
            .unwrap_or_default()
    }

    /// ANSI color escape used by terminal renderers
    pub fn ansi_color(&self) -> &'static str {
        match self {
            Self::Default => "\x1b[36m",
            Self::Cloudy => "\x1b[37m",
            Self::Rainy => "\x1b[34m",
            Self::Clear => "\x1b[33m",
        }
    }
}
