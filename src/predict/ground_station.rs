use serde::{Deserialize, Serialize};

/// A receiving site. Immutable once loaded from configuration.
///
/// `altitude` is meters above the WGS-84 ellipsoid; `minimum_elevation` is
/// the degrees above the horizon a satellite must reach before a pass is
/// worth recording.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroundStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default = "default_minimum_elevation")]
    pub minimum_elevation: f64,
    #[serde(default)]
    pub satellites: Vec<u32>,
}

fn default_minimum_elevation() -> f64 {
    10.0
}

impl GroundStation {
    pub fn tracks(&self, norad_id: u32) -> bool {
        self.satellites.contains(&norad_id)
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude / 1000.0;
        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(lat: f64, lon: f64, alt: f64) -> GroundStation {
        GroundStation {
            name: "test".to_string(),
            latitude: lat,
            longitude: lon,
            altitude: alt,
            minimum_elevation: 10.0,
            satellites: vec![25544],
        }
    }

    #[test]
    fn equator_position_lies_on_x_axis() {
        let pos = station(0.0, 0.0, 0.0).position_ecef_km();
        assert!((pos[0] - 6378.137).abs() < 1e-6);
        assert!(pos[1].abs() < 1e-9);
        assert!(pos[2].abs() < 1e-9);
    }

    #[test]
    fn pole_position_lies_on_z_axis() {
        let pos = station(90.0, 0.0, 0.0).position_ecef_km();
        assert!(pos[0].abs() < 1e-6);
        // polar radius of the ellipsoid
        assert!((pos[2] - 6356.752).abs() < 1e-2);
    }

    #[test]
    fn tracks_only_listed_satellites() {
        let s = station(45.0, 2.0, 100.0);
        assert!(s.tracks(25544));
        assert!(!s.tracks(33591));
    }
}
