use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::{GroundStation, PassWindow, Satellite};

/// A schedulable unit of recording work derived from one pass. The name is
/// deterministic: repeated runs over an unchanged catalog and the same
/// "now" produce identical descriptors.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptor {
    pub name: String,
    pub namespace: String,
    pub satellite: Arc<Satellite>,
    pub station: Arc<GroundStation>,
    pub start_time: DateTime<Utc>,
    pub max_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_seconds: i64,
    pub sleep_seconds: i64,
}

/// Maps sorted catalog entries to descriptors.
pub struct JobDescriptorBuilder {
    namespace: String,
    now: DateTime<Utc>,
}

impl JobDescriptorBuilder {
    pub fn new(namespace: String, now: DateTime<Utc>) -> Self {
        Self { namespace, now }
    }

    /// `sequence` is the window's 1-based position within the sorted
    /// catalog, the closest available thing to idempotency without
    /// external state.
    pub fn build(&self, window: &PassWindow, sequence: usize) -> JobDescriptor {
        let sleep_seconds = (window.start_time - self.now).num_seconds().max(0);
        let name = format!(
            "record-{}-{}-{:03}",
            slug(&window.satellite.name),
            window.start_time.format("%m%d-%H%M"),
            sequence
        );

        JobDescriptor {
            name,
            namespace: self.namespace.clone(),
            satellite: window.satellite.clone(),
            station: window.station.clone(),
            start_time: window.start_time,
            max_time: window.max_time,
            end_time: window.end_time,
            max_elevation_deg: window.max_elevation_deg,
            duration_seconds: window.duration_seconds,
            sleep_seconds,
        }
    }
}

pub(crate) fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
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

    fn window(start: DateTime<Utc>) -> PassWindow {
        PassWindow::build(
            satellite(),
            station(),
            start,
            start + Duration::seconds(300),
            start + Duration::seconds(600),
            45.0,
        )
        .unwrap()
    }

    #[test]
    fn names_follow_the_record_convention() {
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 14, 5, 0).unwrap();
        let builder = JobDescriptorBuilder::new("recordings".to_string(), start);

        let job = builder.build(&window(start), 1);
        assert_eq!(job.name, "record-noaa-19-0807-1405-001");

        let job = builder.build(&window(start), 12);
        assert_eq!(job.name, "record-noaa-19-0807-1405-012");
    }

    #[test]
    fn sleep_counts_down_to_the_start() {
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 14, 5, 0).unwrap();
        let now = start - Duration::seconds(90);
        let builder = JobDescriptorBuilder::new("recordings".to_string(), now);

        assert_eq!(builder.build(&window(start), 1).sleep_seconds, 90);
    }

    #[test]
    fn sleep_never_goes_negative() {
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 14, 5, 0).unwrap();
        let now = start + Duration::seconds(30);
        let builder = JobDescriptorBuilder::new("recordings".to_string(), now);

        assert_eq!(builder.build(&window(start), 1).sleep_seconds, 0);
    }

    #[test]
    fn building_twice_is_deterministic() {
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 14, 5, 0).unwrap();
        let builder = JobDescriptorBuilder::new("recordings".to_string(), start);
        let window = window(start);

        let first = builder.build(&window, 7);
        let second = builder.build(&window, 7);
        assert_eq!(first.name, second.name);
        assert_eq!(first.sleep_seconds, second.sleep_seconds);
    }

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slug("NOAA 19"), "noaa-19");
        assert_eq!(slug("METEOR M2 3"), "meteor-m2-3");
    }
}
