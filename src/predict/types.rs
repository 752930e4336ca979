use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ground_station::GroundStation;

/// A satellite configured for tracking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Satellite {
    pub name: String,
    pub id: u32,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_frequency() -> f64 {
    137.5
}

/// One elevation measurement, produced on demand.
#[derive(Debug, Clone, Copy)]
pub struct ElevationSample {
    pub time: DateTime<Utc>,
    pub elevation_deg: f64,
}

/// A refined threshold crossing or maximum for one (satellite, station)
/// pair. Events for a pair are totally ordered by time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Rise { time: DateTime<Utc> },
    Culmination { time: DateTime<Utc>, elevation_deg: f64 },
    Set { time: DateTime<Utc> },
}

impl Event {
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            Event::Rise { time } => *time,
            Event::Culmination { time, .. } => *time,
            Event::Set { time } => *time,
        }
    }

    /// Tie-break for coincident timestamps: a rise sorts before the
    /// culmination of the same instant, which sorts before the set.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Event::Rise { .. } => 0,
            Event::Culmination { .. } => 1,
            Event::Set { .. } => 2,
        }
    }
}

/// A complete visibility window. Only constructible through
/// [`PassWindow::build`], which enforces the ordering and threshold
/// invariants.
#[derive(Debug, Clone, Serialize)]
pub struct PassWindow {
    pub satellite: Arc<Satellite>,
    pub station: Arc<GroundStation>,
    pub start_time: DateTime<Utc>,
    pub max_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_seconds: i64,
}

impl PassWindow {
    /// Returns `None` unless `start < max < end` and the maximum elevation
    /// clears the station's threshold. Invalid windows are discarded, never
    /// constructed.
    pub fn build(
        satellite: Arc<Satellite>,
        station: Arc<GroundStation>,
        start_time: DateTime<Utc>,
        max_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        max_elevation_deg: f64,
    ) -> Option<Self> {
        if !(start_time < max_time && max_time < end_time) {
            return None;
        }
        if max_elevation_deg < station.minimum_elevation {
            return None;
        }

        let duration_seconds =
            ((end_time - start_time).num_milliseconds() as f64 / 1000.0).round() as i64;

        Some(Self {
            satellite,
            station,
            start_time,
            max_time,
            end_time,
            max_elevation_deg: round2(max_elevation_deg),
            duration_seconds,
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn satellite() -> Arc<Satellite> {
        Arc::new(Satellite {
            name: "NOAA 19".to_string(),
            id: 33591,
            frequency: 137.1,
        })
    }

    fn station() -> Arc<GroundStation> {
        Arc::new(GroundStation {
            name: "alpha".to_string(),
            latitude: 45.0,
            longitude: 2.0,
            altitude: 100.0,
            minimum_elevation: 10.0,
            satellites: vec![33591],
        })
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn builds_valid_window() {
        let start = t0();
        let max = start + Duration::seconds(233);
        let end = start + Duration::milliseconds(466_700);

        let window = PassWindow::build(satellite(), station(), start, max, end, 45.004).unwrap();
        assert_eq!(window.duration_seconds, 467);
        assert_eq!(window.max_elevation_deg, 45.0);
    }

    #[test]
    fn rejects_unordered_times() {
        let start = t0();
        let max = start + Duration::seconds(100);
        let end = start + Duration::seconds(50);
        assert!(PassWindow::build(satellite(), station(), start, max, end, 45.0).is_none());

        let max = start - Duration::seconds(1);
        let end = start + Duration::seconds(50);
        assert!(PassWindow::build(satellite(), station(), start, max, end, 45.0).is_none());
    }

    #[test]
    fn rejects_below_threshold() {
        let start = t0();
        let max = start + Duration::seconds(100);
        let end = start + Duration::seconds(200);
        assert!(PassWindow::build(satellite(), station(), start, max, end, 9.99).is_none());
    }

    #[test]
    fn coincident_events_rank_rise_first() {
        let set = Event::Set { time: t0() };
        let rise = Event::Rise { time: t0() };
        assert!(rise.rank() < set.rank());
        assert_eq!(set.time(), rise.time());
    }
}
