use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::elements::TleSet;

use super::assembler::PassAssembler;
use super::error::PredictError;
use super::events::detect_events;
use super::ground_station::GroundStation;
use super::propagation::Sgp4Elevation;
use super::sampler::ElevationSampler;
use super::types::{PassWindow, Satellite};

/// A (satellite, station) pair that contributed no windows.
#[derive(Debug)]
pub struct PairFailure {
    pub satellite: String,
    pub station: String,
    pub error: PredictError,
}

/// All windows across every configured pair, sorted, plus the pairs that
/// failed. A failed pair never aborts the catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    pub passes: Vec<PassWindow>,
    pub failures: Vec<PairFailure>,
}

/// Run detection for the cross-product of stations and their tracked
/// satellites. Pairs are independent and side-effect-free, so they fan out
/// over a bounded pool of blocking workers; the final sort makes the result
/// independent of completion order.
pub async fn build_catalog(
    stations: &[Arc<GroundStation>],
    satellites: &[Arc<Satellite>],
    elements: &HashMap<String, TleSet>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    tolerance: Duration,
) -> Catalog {
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let limit = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();
    let mut catalog = Catalog::default();

    for station in stations {
        for satellite in satellites.iter().filter(|s| station.tracks(s.id)) {
            let Some(tle) = elements.get(&satellite.name) else {
                let failure = PairFailure {
                    satellite: satellite.name.clone(),
                    station: station.name.clone(),
                    error: PredictError::MissingElements(satellite.name.clone()),
                };
                warn!("no element set for {} at {}", failure.satellite, failure.station);
                catalog.failures.push(failure);
                continue;
            };

            let permit = limit.clone().acquire_owned().await.unwrap();
            let satellite = satellite.clone();
            let station = station.clone();
            let tle = tle.clone();
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = detect_pair(&satellite, &station, &tle, start, end, step, tolerance);
                (satellite, station, result)
            });
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((satellite, station, Ok(mut windows))) => {
                debug!(
                    "{} passes for {} at {}",
                    windows.len(),
                    satellite.name,
                    station.name
                );
                catalog.passes.append(&mut windows);
            }
            Ok((satellite, station, Err(error))) => {
                let failure = PairFailure {
                    satellite: satellite.name.clone(),
                    station: station.name.clone(),
                    error,
                };
                warn!(
                    "pass detection failed for {} at {}: {}",
                    failure.satellite, failure.station, failure.error
                );
                catalog.failures.push(failure);
            }
            Err(e) => warn!("detection task failed to complete: {}", e),
        }
    }

    sort_windows(&mut catalog.passes);
    catalog
}

/// Stable order: start time, then satellite id, then station name.
pub(crate) fn sort_windows(windows: &mut [PassWindow]) {
    windows.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.satellite.id.cmp(&b.satellite.id))
            .then_with(|| a.station.name.cmp(&b.station.name))
    });
}

fn detect_pair(
    satellite: &Arc<Satellite>,
    station: &Arc<GroundStation>,
    tle: &TleSet,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    tolerance: Duration,
) -> Result<Vec<PassWindow>, PredictError> {
    let provider = Sgp4Elevation::from_tle(station, &satellite.name, &tle.line1, &tle.line2)?;
    let sampler = ElevationSampler::new(&provider, step, tolerance);
    let events = detect_events(&sampler, start, end, station.minimum_elevation);
    let assembler = PassAssembler::new(satellite.clone(), station.clone());
    Ok(assembler.assemble(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn satellite(name: &str, id: u32) -> Arc<Satellite> {
        Arc::new(Satellite {
            name: name.to_string(),
            id,
            frequency: 137.5,
        })
    }

    fn station(name: &str, tracked: Vec<u32>) -> Arc<GroundStation> {
        Arc::new(GroundStation {
            name: name.to_string(),
            latitude: 45.0,
            longitude: 2.0,
            altitude: 100.0,
            minimum_elevation: 10.0,
            satellites: tracked,
        })
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn window(
        sat: &Arc<Satellite>,
        sta: &Arc<GroundStation>,
        start_offset_s: i64,
    ) -> PassWindow {
        let start = t0() + Duration::seconds(start_offset_s);
        PassWindow::build(
            sat.clone(),
            sta.clone(),
            start,
            start + Duration::seconds(300),
            start + Duration::seconds(600),
            45.0,
        )
        .unwrap()
    }

    #[test]
    fn windows_sort_by_start_then_satellite_then_station() {
        let sat_a = satellite("NOAA 15", 25338);
        let sat_b = satellite("NOAA 19", 33591);
        let sta_a = station("alpha", vec![25338, 33591]);
        let sta_b = station("bravo", vec![25338, 33591]);

        let mut windows = vec![
            window(&sat_b, &sta_a, 0),
            window(&sat_a, &sta_b, 100),
            window(&sat_a, &sta_a, 0),
            window(&sat_b, &sta_b, 0),
        ];
        sort_windows(&mut windows);

        let order: Vec<_> = windows
            .iter()
            .map(|w| (w.satellite.id, w.station.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (25338, "alpha"),
                (33591, "alpha"),
                (33591, "bravo"),
                (25338, "bravo"),
            ]
        );
    }

    #[tokio::test]
    async fn missing_elements_become_failures_not_errors() {
        let sats = vec![satellite("NOAA 15", 25338), satellite("NOAA 19", 33591)];
        let stations = vec![station("alpha", vec![25338, 33591])];
        // only NOAA 19 has elements, and they are junk
        let mut elements = HashMap::new();
        elements.insert(
            "NOAA 19".to_string(),
            TleSet {
                name: "NOAA 19".to_string(),
                line1: "1 garbage".to_string(),
                line2: "2 garbage".to_string(),
            },
        );

        let catalog = build_catalog(
            &stations,
            &sats,
            &elements,
            t0(),
            t0() + Duration::hours(1),
            Duration::seconds(30),
            Duration::seconds(1),
        )
        .await;

        assert!(catalog.passes.is_empty());
        assert_eq!(catalog.failures.len(), 2);
        assert!(catalog
            .failures
            .iter()
            .any(|f| matches!(f.error, PredictError::MissingElements(_))));
        assert!(catalog
            .failures
            .iter()
            .any(|f| matches!(f.error, PredictError::InvalidElements { .. })));
    }

    #[tokio::test]
    async fn untracked_satellites_are_not_considered() {
        let sats = vec![satellite("NOAA 15", 25338)];
        let stations = vec![station("alpha", vec![33591])];
        let elements = HashMap::new();

        let catalog = build_catalog(
            &stations,
            &sats,
            &elements,
            t0(),
            t0() + Duration::hours(1),
            Duration::seconds(30),
            Duration::seconds(1),
        )
        .await;

        assert!(catalog.passes.is_empty());
        assert!(catalog.failures.is_empty());
    }
}
