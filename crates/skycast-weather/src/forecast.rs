//! Reduction of the 3-hourly forecast series to one reading per day.
//!
//! A day is represented by its 12:00:00 reading. Days without an exact noon
//! reading are left out; there is no interpolation or nearest-match fallback.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::types::ForecastEntry;
use crate::wire::RawReading;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the provider's textual reading timestamp
pub fn parse_reading_time(dt_txt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(dt_txt.trim(), DT_TXT_FORMAT).ok()
}

fn is_noon(time: NaiveTime) -> bool {
    time.hour() == 12 && time.minute() == 0 && time.second() == 0
}

/// Lazily keep the noon readings of a forecast series, in input order.
///
/// Readings whose timestamp does not parse are skipped.
pub fn noon_readings<I>(readings: I) -> impl Iterator<Item = ForecastEntry>
where
    I: IntoIterator<Item = RawReading>,
{
    readings.into_iter().filter_map(|reading| {
        let Some(local_time) = parse_reading_time(&reading.dt_txt) else {
            tracing::debug!(dt_txt = %reading.dt_txt, "skipping reading with unparseable timestamp");
            return None;
        };

        if !is_noon(local_time.time()) {
            return None;
        }

        let condition = reading.weather.into_iter().next().unwrap_or_default();
        Some(ForecastEntry {
            timestamp: reading.dt,
            local_time,
            temperature: reading.main.temp,
            icon: condition.icon,
            description: condition.description,
        })
    })
}
