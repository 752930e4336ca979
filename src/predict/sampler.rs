use chrono::{DateTime, Duration, Utc};
use log::warn;

use super::error::PredictError;
use super::propagation::ElevationProvider;
use super::types::ElevationSample;

/// Coarse time-sampling plus fine-grained root refinement over an elevation
/// function. `step` drives the initial scan; `tolerance` bounds the bracket
/// width both refinement modes converge to.
pub struct ElevationSampler<'a, P: ElevationProvider> {
    provider: &'a P,
    step: Duration,
    tolerance: Duration,
}

impl<'a, P: ElevationProvider> ElevationSampler<'a, P> {
    pub fn new(provider: &'a P, step: Duration, tolerance: Duration) -> Self {
        Self {
            provider,
            step,
            tolerance,
        }
    }

    /// Lazy, finite sequence of samples over `[start, end]`. A provider
    /// failure or non-finite value drops that sample with a warning; the
    /// rest of the horizon is unaffected. Restartable: every call starts a
    /// fresh scan.
    pub fn samples(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = ElevationSample> + '_ {
        let mut cursor = start;
        std::iter::from_fn(move || {
            while cursor <= end {
                let at = cursor;
                cursor += self.step;
                match self.provider.elevation_deg(at) {
                    Ok(v) if v.is_finite() => {
                        return Some(ElevationSample {
                            time: at,
                            elevation_deg: v,
                        })
                    }
                    Ok(v) => warn!("dropping non-finite elevation {} at {}", v, at),
                    Err(e) => warn!("dropping sample at {}: {}", at, e),
                }
            }
            None
        })
    }

    /// Bisect a bracket known to contain a single crossing of `threshold`
    /// degrees, in the direction given by `rising`.
    pub fn refine_crossing(
        &self,
        low: DateTime<Utc>,
        high: DateTime<Utc>,
        threshold: f64,
        rising: bool,
    ) -> Result<DateTime<Utc>, PredictError> {
        let mut low = low;
        let mut high = high;

        while high - low > self.tolerance {
            let mid = low + (high - low) / 2;
            let above = self.elevation_at(mid)? >= threshold;
            if above == rising {
                high = mid;
            } else {
                low = mid;
            }
        }

        Ok(high)
    }

    /// Ternary search over a bracket known to contain a single interior
    /// maximum. Returns the refined time and the elevation there.
    pub fn refine_peak(
        &self,
        low: DateTime<Utc>,
        high: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, f64), PredictError> {
        let mut low = low;
        let mut high = high;

        while high - low > self.tolerance {
            let third = (high - low) / 3;
            let m1 = low + third;
            let m2 = high - third;
            if self.elevation_at(m1)? < self.elevation_at(m2)? {
                low = m1;
            } else {
                high = m2;
            }
        }

        let mid = low + (high - low) / 2;
        Ok((mid, self.elevation_at(mid)?))
    }

    fn elevation_at(&self, at: DateTime<Utc>) -> Result<f64, PredictError> {
        let v = self.provider.elevation_deg(at)?;
        if !v.is_finite() {
            return Err(PredictError::NonFinite(at));
        }
        Ok(v)
    }
}
