//! Interpolators estimate a value at a query point from a neighbourhood of
//! weighted points.
//!
//! The first `query.len()` components of every point are spatial, the
//! component right after them is the value being averaged.

use thiserror::Error;

use crate::tools::norm::Norm;
use crate::weighted_points::WeightedPoints;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("no points to interpolate from")]
    EmptyNeighbourhood,

    #[error("point has {point} components but a {spatial} dimensional query needs {required}")]
    DimensionMismatch {
        point: usize,
        spatial: usize,
        required: usize,
    },

    #[error("interpolation weights sum to {0}")]
    DegenerateWeights(f64),

    #[error("interpolated value {0} is not finite")]
    NonFinite(f64),
}

pub trait Interpolator: Send + Sync {
    fn interpolate(&self, points: &WeightedPoints, query: &[f64]) -> Result<f64, InterpolationError>;
}

/// Splits a point into its spatial part and the value that follows it
fn split_point(point: &[f64], spatial: usize) -> Result<(&[f64], f64), InterpolationError> {
    match point.get(spatial) {
        Some(value) => Ok((&point[..spatial], *value)),
        None => Err(InterpolationError::DimensionMismatch {
            point: point.len(),
            spatial,
            required: spatial + 1,
        }),
    }
}

/// Normalized weighted average, rejecting sums that cannot be divided by
fn weighted_average(
    weighted_values: impl Iterator<Item = Result<(f64, f64), InterpolationError>>,
) -> Result<f64, InterpolationError> {
    let mut total = 0.0;
    let mut weighted_sum = 0.0;
    for item in weighted_values {
        let (weight, value) = item?;
        total += weight;
        weighted_sum += weight * value;
    }

    if !(total > 0.0) || !total.is_finite() {
        return Err(InterpolationError::DegenerateWeights(total));
    }

    let average = weighted_sum / total;
    if !average.is_finite() {
        return Err(InterpolationError::NonFinite(average));
    }
    Ok(average)
}

/// Decay steepness of [`ArithmeticMeanInterpolator::default`].
///
/// `alpha = 50` (`"alpha": 50.0` in a fill config) is the sharp preset: the
/// nearest known points dominate and farther ones barely count. It matches
/// the filler of the hrosailing Python package.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Weighted arithmetic mean with a gaussian style decay in distance.
///
/// Every point influences the result with `weight * beta * exp(-alpha * distance)`,
/// the result is the influence weighted mean of the point values times `scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArithmeticMeanInterpolator {
    alpha: f64,
    beta: f64,
    scale: f64,
    norm: Norm,
}

impl ArithmeticMeanInterpolator {
    pub fn new(alpha: f64, beta: f64) -> Self {
        ArithmeticMeanInterpolator {
            alpha,
            beta,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Influence of a point with the given weight at the given distance
    pub fn influence(&self, weight: f64, distance: f64) -> f64 {
        weight * self.beta * (-self.alpha * distance).exp()
    }
}

impl Default for ArithmeticMeanInterpolator {
    fn default() -> Self {
        ArithmeticMeanInterpolator {
            alpha: DEFAULT_ALPHA,
            beta: 1.0,
            scale: 1.0,
            norm: Norm::Euclidean,
        }
    }
}

impl Interpolator for ArithmeticMeanInterpolator {
    fn interpolate(&self, points: &WeightedPoints, query: &[f64]) -> Result<f64, InterpolationError> {
        if points.is_empty() {
            return Err(InterpolationError::EmptyNeighbourhood);
        }

        let average = weighted_average(points.iter().map(|(point, weight)| {
            let (spatial, value) = split_point(point, query.len())?;
            let distance = self.norm.distance(spatial, query);
            Ok((self.influence(weight, distance), value))
        }))?;

        let result = self.scale * average;
        if !result.is_finite() {
            return Err(InterpolationError::NonFinite(result));
        }
        Ok(result)
    }
}

/// Shepard's inverse distance weighting.
///
/// Points coinciding with the query point return their (weighted) value
/// directly, otherwise every point contributes `weight / distance^power`.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseDistanceInterpolator {
    power: f64,
    norm: Norm,
}

impl InverseDistanceInterpolator {
    pub fn new(power: f64) -> Self {
        InverseDistanceInterpolator {
            power,
            norm: Norm::Euclidean,
        }
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }
}

impl Default for InverseDistanceInterpolator {
    fn default() -> Self {
        InverseDistanceInterpolator::new(2.0)
    }
}

impl Interpolator for InverseDistanceInterpolator {
    fn interpolate(&self, points: &WeightedPoints, query: &[f64]) -> Result<f64, InterpolationError> {
        if points.is_empty() {
            return Err(InterpolationError::EmptyNeighbourhood);
        }

        let mut measured = Vec::with_capacity(points.len());
        for (point, weight) in points.iter() {
            let (spatial, value) = split_point(point, query.len())?;
            measured.push((self.norm.distance(spatial, query), weight, value));
        }

        let coincident = measured
            .iter()
            .any(|(distance, weight, _)| *distance == 0.0 && *weight > 0.0);
        if coincident {
            return weighted_average(
                measured
                    .iter()
                    .filter(|(distance, _, _)| *distance == 0.0)
                    .map(|(_, weight, value)| Ok((*weight, *value))),
            );
        }

        weighted_average(
            measured
                .iter()
                .map(|(distance, weight, value)| Ok((weight / distance.powf(self.power), *value))),
        )
    }
}
