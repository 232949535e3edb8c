use serde::{Deserialize, Serialize};

use crate::error::{PolarDiagramError, Result};

/// Points in wind coordinates paired with non-negative weights.
///
/// Every point is a row of coordinates, typically `[wind speed, wind angle,
/// boat speed]`, where the leading components are spatial and the trailing
/// component carries the value an interpolator averages. A weight of zero
/// keeps the point in the set without letting it contribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightedPointsRecord")]
pub struct WeightedPoints {
    points: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

#[derive(Deserialize)]
struct WeightedPointsRecord {
    points: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl TryFrom<WeightedPointsRecord> for WeightedPoints {
    type Error = PolarDiagramError;

    fn try_from(record: WeightedPointsRecord) -> Result<Self> {
        WeightedPoints::new(record.points, record.weights)
    }
}

impl WeightedPoints {
    pub fn new(points: Vec<Vec<f64>>, weights: Vec<f64>) -> Result<Self> {
        if points.len() != weights.len() {
            return Err(PolarDiagramError::InvalidWeights(format!(
                "{} points were given {} weights",
                points.len(),
                weights.len()
            )));
        }

        if let Some(weight) = weights.iter().find(|w| !(**w >= 0.0) || !w.is_finite()) {
            return Err(PolarDiagramError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {weight}"
            )));
        }

        Ok(WeightedPoints { points, weights })
    }

    /// Every point receives the same weight
    pub fn with_uniform_weight(points: Vec<Vec<f64>>, weight: f64) -> Result<Self> {
        let weights = vec![weight; points.len()];
        WeightedPoints::new(points, weights)
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        self.points
            .iter()
            .zip(self.weights.iter())
            .map(|(p, w)| (p.as_slice(), *w))
    }

    /// New set holding the points whose mask entry is true, in their original order.
    ///
    /// # Panics
    /// Panics if the mask length differs from the number of points
    pub fn subset(&self, mask: &[bool]) -> WeightedPoints {
        assert_eq!(mask.len(), self.len(), "mask must have one entry per point");

        let (points, weights): (Vec<Vec<f64>>, Vec<f64>) = self
            .points
            .iter()
            .zip(self.weights.iter())
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|((p, w), _)| (p.clone(), *w))
            .unzip();

        WeightedPoints { points, weights }
    }

    /// Offsets of every point's leading components from the query point
    pub fn offsets(&self, query: &[f64]) -> Vec<Vec<f64>> {
        self.points
            .iter()
            .map(|p| p.iter().zip(query.iter()).map(|(a, b)| a - b).collect())
            .collect()
    }
}

/// Assigns a weight to every point before it takes part in an interpolation
pub trait Weigher: Send + Sync {
    fn weigh(&self, points: &[Vec<f64>]) -> Vec<f64>;
}

/// Gives every point the weight 1
#[derive(Clone, Copy, Debug, Default)]
pub struct AllOneWeigher;

impl Weigher for AllOneWeigher {
    fn weigh(&self, points: &[Vec<f64>]) -> Vec<f64> {
        vec![1.0; points.len()]
    }
}
