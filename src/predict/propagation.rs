use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::PredictError;
use super::ground_station::GroundStation;

/// The elevation of an object above a station's horizon at a given instant,
/// in degrees. Detection only ever calls this lazily at sample and
/// refinement points, so synthetic functions substitute for real orbit math
/// in tests.
pub trait ElevationProvider {
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PredictError>;
}

impl<F> ElevationProvider for F
where
    F: Fn(DateTime<Utc>) -> Result<f64, PredictError>,
{
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PredictError> {
        self(at)
    }
}

/// Topocentric observation of a satellite. Azimuth and range fall out of
/// the same transform; only the elevation drives pass detection.
#[allow(dead_code)]
pub struct LookAngle {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

/// SGP4-backed elevation function for one (satellite, station) pair.
pub struct Sgp4Elevation<'a> {
    station: &'a GroundStation,
    elements: Elements,
    constants: Constants,
}

impl<'a> Sgp4Elevation<'a> {
    pub fn from_tle(
        station: &'a GroundStation,
        name: &str,
        line1: &str,
        line2: &str,
    ) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| PredictError::InvalidElements {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let constants =
            Constants::from_elements(&elements).map_err(|e| PredictError::InvalidElements {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            station,
            elements,
            constants,
        })
    }

    pub fn look_angle(&self, at: DateTime<Utc>) -> Result<LookAngle, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));

        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let sta_ecef = self.station.position_ecef_km();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

        let (east, north, up) = ecef_to_enu(dr, self.station.lat_rad(), self.station.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = if range_km > 0.0 {
            (up / range_km).asin().to_degrees()
        } else {
            0.0
        };

        Ok(LookAngle {
            azimuth_deg,
            elevation_deg,
            range_km,
        })
    }
}

impl ElevationProvider for Sgp4Elevation<'_> {
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PredictError> {
        Ok(self.look_angle(at)?.elevation_deg)
    }
}

fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}
