use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::ground_station::GroundStation;
use super::types::{Event, PassWindow, Satellite};

/// Where the assembler is within the current pass.
enum State {
    AwaitingRise,
    AwaitingCulmination {
        start: DateTime<Utc>,
    },
    AwaitingSet {
        start: DateTime<Utc>,
        max_time: DateTime<Utc>,
        max_elevation_deg: f64,
    },
}

/// Folds an ordered event stream into complete passes: first rise, first
/// following culmination, first following set. Anything partial — a pass
/// already in progress at the horizon start, a tail cut off by the horizon
/// end, a set with no recorded culmination — is discarded, not an error.
pub struct PassAssembler {
    satellite: Arc<Satellite>,
    station: Arc<GroundStation>,
}

impl PassAssembler {
    pub fn new(satellite: Arc<Satellite>, station: Arc<GroundStation>) -> Self {
        Self { satellite, station }
    }

    pub fn assemble(&self, events: impl IntoIterator<Item = Event>) -> Vec<PassWindow> {
        let mut state = State::AwaitingRise;
        let mut passes = Vec::new();

        for event in events {
            state = self.step(state, event, &mut passes);
        }

        // whatever remains is an incomplete triple
        passes
    }

    fn step(&self, state: State, event: Event, out: &mut Vec<PassWindow>) -> State {
        match (state, event) {
            (State::AwaitingRise, Event::Rise { time }) => {
                State::AwaitingCulmination { start: time }
            }
            // only the first unmatched rise counts
            (State::AwaitingCulmination { start }, Event::Rise { .. }) => {
                State::AwaitingCulmination { start }
            }
            // a repeated rise abandons the recorded culmination
            (State::AwaitingSet { start, .. }, Event::Rise { .. }) => {
                State::AwaitingCulmination { start }
            }
            (
                State::AwaitingCulmination { start },
                Event::Culmination {
                    time,
                    elevation_deg,
                },
            ) => State::AwaitingSet {
                start,
                max_time: time,
                max_elevation_deg: elevation_deg,
            },
            // first culmination wins
            (state @ State::AwaitingSet { .. }, Event::Culmination { .. }) => state,
            (
                State::AwaitingSet {
                    start,
                    max_time,
                    max_elevation_deg,
                },
                Event::Set { time },
            ) => {
                if let Some(pass) = PassWindow::build(
                    self.satellite.clone(),
                    self.station.clone(),
                    start,
                    max_time,
                    time,
                    max_elevation_deg,
                ) {
                    out.push(pass);
                }
                State::AwaitingRise
            }
            // a set with no rise, or no culmination, cannot form a window
            (State::AwaitingCulmination { .. }, Event::Set { .. }) => State::AwaitingRise,
            (State::AwaitingRise, _) => State::AwaitingRise,
        }
    }
}
