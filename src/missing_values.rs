//! Filling gaps in boat speed tables.
//!
//! Missing boat speeds are NaN. Every known cell becomes a weighted point
//! `[wind speed, wind angle, boat speed]`; each missing cell is estimated from
//! the known points inside its neighbourhood. Known cells are passed through
//! untouched and every estimate is clamped to be non-negative.

use log::{debug, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::FillConfig;
use crate::error::{PolarDiagramError, Result};
use crate::interpolator::{ArithmeticMeanInterpolator, Interpolator};
use crate::neighbourhood::{Ball, Neighbourhood};
use crate::tools::vector::fill_nan;
use crate::weighted_points::{AllOneWeigher, Weigher, WeightedPoints};

/// Fewer known points than this and the table is zero filled instead of interpolated
pub const MIN_KNOWN_POINTS: usize = 3;

/// Checks if the boat speed table contains any missing (NaN) values
pub fn has_missing_values(boat_speeds: &[Vec<f64>]) -> bool {
    boat_speeds.iter().flatten().any(|v| v.is_nan())
}

/// Replaces every missing boat speed with zero
pub fn zero_fill(boat_speeds: &[Vec<f64>]) -> Vec<Vec<f64>> {
    boat_speeds.iter().map(|row| fill_nan(row, 0.0)).collect()
}

/// Fills missing values with the default filler.
///
/// Returns the dense table and whether any cell was missing.
pub fn interpolate_missing_values(
    wind_speeds: &[f64],
    wind_angles: &[f64],
    boat_speeds: &[Vec<f64>],
) -> Result<(Vec<Vec<f64>>, bool)> {
    MissingValueFiller::default().fill(wind_speeds, wind_angles, boat_speeds)
}

pub struct MissingValueFiller {
    interpolator: Box<dyn Interpolator>,
    neighbourhood: Box<dyn Neighbourhood>,
    weigher: Box<dyn Weigher>,
    min_points: usize,
}

impl Default for MissingValueFiller {
    fn default() -> Self {
        MissingValueFiller {
            interpolator: Box::new(ArithmeticMeanInterpolator::default()),
            neighbourhood: Box::new(Ball::default()),
            weigher: Box::new(AllOneWeigher),
            min_points: MIN_KNOWN_POINTS,
        }
    }
}

impl std::fmt::Debug for MissingValueFiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissingValueFiller")
            .field("min_points", &self.min_points)
            .finish_non_exhaustive()
    }
}

impl MissingValueFiller {
    pub fn new() -> Self {
        MissingValueFiller::default()
    }

    pub fn from_config(config: &FillConfig) -> Result<Self> {
        Ok(MissingValueFiller {
            interpolator: config.interpolator.build(&config.norm),
            neighbourhood: config.neighbourhood.build(&config.norm)?,
            weigher: Box::new(AllOneWeigher),
            min_points: config.min_points,
        })
    }

    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    pub fn with_neighbourhood(mut self, neighbourhood: impl Neighbourhood + 'static) -> Self {
        self.neighbourhood = Box::new(neighbourhood);
        self
    }

    pub fn with_weigher(mut self, weigher: impl Weigher + 'static) -> Self {
        self.weigher = Box::new(weigher);
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Returns a dense copy of `boat_speeds` and whether any value was missing.
    ///
    /// `boat_speeds[i][j]` belongs to `wind_angles[i]` and `wind_speeds[j]`.
    /// Only a table whose shape disagrees with the axes is an error.
    pub fn fill(
        &self,
        wind_speeds: &[f64],
        wind_angles: &[f64],
        boat_speeds: &[Vec<f64>],
    ) -> Result<(Vec<Vec<f64>>, bool)> {
        check_shape(wind_speeds, wind_angles, boat_speeds)?;

        if !has_missing_values(boat_speeds) {
            return Ok((boat_speeds.to_vec(), false));
        }

        let known = self.known_points(wind_speeds, wind_angles, boat_speeds)?;
        let missing = boat_speeds.iter().flatten().filter(|v| v.is_nan()).count();

        if known.len() < self.min_points {
            warn!(
                "only {} known boat speeds, zero filling {} missing values",
                known.len(),
                missing
            );
            return Ok((zero_fill(boat_speeds), true));
        }

        debug!(
            "interpolating {} missing boat speeds from {} known points",
            missing,
            known.len()
        );

        #[cfg(feature = "parallel")]
        let filled: Vec<Vec<f64>> = boat_speeds
            .par_iter()
            .zip(wind_angles.par_iter())
            .map(|(row, wa)| self.fill_row(&known, wind_speeds, *wa, row))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let filled: Vec<Vec<f64>> = boat_speeds
            .iter()
            .zip(wind_angles.iter())
            .map(|(row, wa)| self.fill_row(&known, wind_speeds, *wa, row))
            .collect();

        Ok((filled, true))
    }

    fn known_points(
        &self,
        wind_speeds: &[f64],
        wind_angles: &[f64],
        boat_speeds: &[Vec<f64>],
    ) -> Result<WeightedPoints> {
        let points: Vec<Vec<f64>> = boat_speeds
            .iter()
            .zip(wind_angles.iter())
            .flat_map(|(row, wa)| {
                row.iter()
                    .zip(wind_speeds.iter())
                    .filter(|(bsp, _)| !bsp.is_nan())
                    .map(move |(bsp, ws)| vec![*ws, *wa, *bsp])
            })
            .collect();

        let weights = self.weigher.weigh(&points);
        WeightedPoints::new(points, weights)
    }

    fn fill_row(&self, known: &WeightedPoints, wind_speeds: &[f64], wind_angle: f64, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(wind_speeds.iter())
            .map(|(bsp, ws)| {
                if bsp.is_nan() {
                    self.estimate(known, *ws, wind_angle)
                } else {
                    *bsp
                }
            })
            .collect()
    }

    fn estimate(&self, known: &WeightedPoints, wind_speed: f64, wind_angle: f64) -> f64 {
        let query = [wind_speed, wind_angle];
        let mask = self.neighbourhood.contains(&known.offsets(&query));

        if !mask.iter().any(|m| *m) {
            trace!("no known points near ({wind_speed}, {wind_angle}), using 0");
            return 0.0;
        }

        match self.interpolator.interpolate(&known.subset(&mask), &query) {
            // max also maps a NaN estimate to 0
            Ok(value) => {
                trace!("interpolated {value} at ({wind_speed}, {wind_angle})");
                value.max(0.0)
            }
            Err(e) => {
                warn!("interpolation at ({wind_speed}, {wind_angle}) failed, using 0: {e}");
                0.0
            }
        }
    }
}

fn check_shape(wind_speeds: &[f64], wind_angles: &[f64], boat_speeds: &[Vec<f64>]) -> Result<()> {
    let columns = boat_speeds.first().map(|r| r.len()).unwrap_or(0);
    let ragged = boat_speeds.iter().find(|r| r.len() != wind_speeds.len());

    if boat_speeds.len() != wind_angles.len() || ragged.is_some() {
        return Err(PolarDiagramError::DimensionMismatch {
            rows: boat_speeds.len(),
            columns: ragged.map(|r| r.len()).unwrap_or(columns),
            wind_angles: wind_angles.len(),
            wind_speeds: wind_speeds.len(),
        });
    }
    Ok(())
}
