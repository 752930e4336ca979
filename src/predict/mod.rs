mod assembler;
mod catalog;
mod error;
mod events;
mod ground_station;
mod propagation;
mod sampler;
mod types;

pub use catalog::{build_catalog, Catalog, PairFailure};
pub use error::PredictError;
pub use ground_station::GroundStation;
pub use propagation::{ElevationProvider, Sgp4Elevation};
pub use sampler::ElevationSampler;
pub use types::{ElevationSample, Event, PassWindow, Satellite};
