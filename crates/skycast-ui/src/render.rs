//! Text rendering of the three screens.

use std::fmt::Write;

use skycast_session::{Dashboard, Session, View};
use skycast_weather::{Backdrop, SunCycle, Units};

const RESET: &str = "\x1b[0m";

pub const HELP: &str = "\
Commands:
  search          open the search screen
  <city>          look up a city (or: find <city>)
  recent <n>      look up the n-th recent search
  locate          use my location
  clear           forget recent searches
  back            leave the search screen
  home            go to the landing screen
  help            show this list
  quit            exit
Ctrl-C cancels a lookup in progress, or exits at the prompt.";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub units: Units,
    pub show_forecast: bool,
    pub use_color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            show_forecast: true,
            use_color: false,
        }
    }
}

pub fn loading() -> &'static str {
    "Loading..."
}

/// Render the current screen, followed by the error message if any.
/// `now` is epoch seconds, used for the daylight progress.
pub fn render(session: &Session, options: &RenderOptions, now: i64) -> String {
    let mut out = match session.view() {
        View::Landing => landing(),
        View::Search => search(session.recent()),
        View::Dashboard => match session.dashboard() {
            Some(dashboard) => self::dashboard(dashboard, options, now),
            None => landing(),
        },
    };

    if session.is_loading() {
        out.push_str(loading());
        out.push('\n');
    }
    if let Some(error) = session.error() {
        let _ = writeln!(out, "! {error}");
    }
    out
}

pub fn landing() -> String {
    "\
== SkyCast ==
Type a city name to check the weather, or `search` to see recent searches.
"
    .to_string()
}

pub fn search(recent: &[String]) -> String {
    let mut out = String::from("== Search ==\nCity name, or `locate` for your position.\n");
    if recent.is_empty() {
        out.push_str("No recent searches.\n");
    } else {
        out.push_str("Recent searches:\n");
        for (i, name) in recent.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, name);
        }
    }
    out
}

pub fn dashboard(dashboard: &Dashboard, options: &RenderOptions, now: i64) -> String {
    let current = &dashboard.current;
    let t = options.units.temperature_suffix();
    let mut out = String::new();

    let title = match &current.country {
        Some(country) => format!("{}, {}", current.name, country),
        None => current.name.clone(),
    };
    if options.use_color {
        let color = Backdrop::for_snapshot(Some(current)).ansi_color();
        let _ = writeln!(out, "{color}== {title} =={RESET}");
    } else {
        let _ = writeln!(out, "== {title} ==");
    }

    let _ = writeln!(out, "{:.1}{t}  {}", current.temperature, current.description);
    let _ = writeln!(
        out,
        "Feels like {:.1}{t}   Low {:.1}{t}   High {:.1}{t}",
        current.feels_like, current.temp_min, current.temp_max
    );
    let _ = writeln!(
        out,
        "Wind {:.1} {}   Humidity {}%   Pressure {} hPa",
        current.wind_speed,
        options.units.speed_suffix(),
        current.humidity,
        current.pressure
    );
    let _ = writeln!(
        out,
        "Daylight {}% elapsed",
        SunCycle::from_snapshot(current).percent_at(now)
    );

    if options.show_forecast && !dashboard.forecast.is_empty() {
        out.push_str("Forecast at noon:\n");
        for entry in &dashboard.forecast {
            let _ = writeln!(
                out,
                "  {}  {:>6.1}{t}  {}",
                entry.local_time.format("%a %d %b"),
                entry.temperature,
                entry.description
            );
        }
    }
    out
}
