use chrono::{DateTime, Utc};
use log::warn;

use super::propagation::ElevationProvider;
use super::sampler::ElevationSampler;
use super::types::{ElevationSample, Event};

/// Find the ordered rise/culmination/set events for one satellite over one
/// station's horizon.
///
/// Threshold crossings of `(elevation - min_elevation)` between adjacent
/// samples become rise/set brackets; samples higher than both neighbours
/// become culmination brackets. Each bracket is refined before the merged
/// stream is time-sorted. A pass already in progress at the horizon start
/// yields no rise, so it can never assemble into a complete window
/// downstream; a horizon ending mid-pass likewise leaves its tail
/// incomplete.
pub fn detect_events<P: ElevationProvider>(
    sampler: &ElevationSampler<'_, P>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_elevation_deg: f64,
) -> Vec<Event> {
    let samples: Vec<ElevationSample> = sampler.samples(start, end).collect();
    let mut events = Vec::new();

    for pair in samples.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let was_above = prev.elevation_deg >= min_elevation_deg;
        let is_above = cur.elevation_deg >= min_elevation_deg;
        if was_above == is_above {
            continue;
        }
        match sampler.refine_crossing(prev.time, cur.time, min_elevation_deg, is_above) {
            Ok(time) if is_above => events.push(Event::Rise { time }),
            Ok(time) => events.push(Event::Set { time }),
            Err(e) => warn!("skipping threshold crossing near {}: {}", cur.time, e),
        }
    }

    for triple in samples.windows(3) {
        let (left, mid, right) = (triple[0], triple[1], triple[2]);
        if mid.elevation_deg > left.elevation_deg && mid.elevation_deg >= right.elevation_deg {
            match sampler.refine_peak(left.time, right.time) {
                Ok((time, elevation_deg)) => events.push(Event::Culmination {
                    time,
                    elevation_deg,
                }),
                Err(e) => warn!("skipping culmination near {}: {}", mid.time, e),
            }
        }
    }

    events.sort_by_key(|e| (e.time(), e.rank()));
    events
}
